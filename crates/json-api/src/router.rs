//! App Router

use salvo::Router;

use crate::{auth, bookings, carts, fulfillment, prices, products, units, variants};

pub fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .get(products::get::handler)
                        .put(products::update::handler)
                        .delete(products::delete::handler)
                        .push(
                            Router::with_path("variants")
                                .get(variants::index::handler)
                                .post(variants::create::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("variants/{variant}")
                .get(variants::get::handler)
                .put(variants::update::handler)
                .delete(variants::delete::handler)
                .push(
                    Router::with_path("units")
                        .get(units::index::handler)
                        .post(units::create::handler),
                )
                .push(
                    Router::with_path("prices")
                        .get(prices::index::handler)
                        .push(
                            Router::with_path("{period}")
                                .put(prices::set::handler)
                                .delete(prices::delete::handler),
                        ),
                )
                .push(Router::with_path("quote").get(variants::quote::handler))
                .push(
                    Router::with_path("disabled-dates").get(variants::disabled_dates::handler),
                ),
        )
        .push(
            Router::with_path("units/{unit}")
                .delete(units::delete::handler)
                .push(Router::with_path("status").put(units::set_status::handler)),
        )
        .push(
            Router::with_path("carts")
                .post(carts::create::handler)
                .push(
                    Router::with_path("{cart}")
                        .get(carts::get::handler)
                        .delete(carts::delete::handler)
                        .push(
                            Router::with_path("items")
                                .post(carts::items::create::handler)
                                .push(
                                    Router::with_path("{item}")
                                        .delete(carts::items::delete::handler),
                                ),
                        )
                        .push(Router::with_path("checkout").post(bookings::checkout::handler)),
                ),
        )
        .push(
            Router::with_path("bookings")
                .get(bookings::index::handler)
                .push(
                    Router::with_path("{booking}")
                        .get(bookings::get::handler)
                        .push(Router::with_path("cancel").post(bookings::cancel::handler)),
                ),
        )
        .push(
            Router::with_path("fulfillment")
                .push(Router::with_path("pickups").get(fulfillment::pickups::handler))
                .push(Router::with_path("returns").get(fulfillment::returns::handler))
                .push(
                    Router::with_path("details/{detail}")
                        .push(Router::with_path("pickup").post(fulfillment::pickup::handler))
                        .push(Router::with_path("return").post(fulfillment::ret::handler)),
                ),
        )
}
