//! Route table.
//!
//! Session routes are open; every role scope is wrapped in a
//! [`RoleGuard`] so its handlers only run for admitted visitors.
//!
//! ```text
//! GET  /               landing redirect
//! GET  /session        session bootstrap
//! POST /login | /logout
//! /admin/*             admin
//! /owner               owner
//! /manager/*           manager, admin
//! /cashier/*           cashier
//! /seller/*            seller
//! /store-keeper/*      store keeper
//! /messages/*          any signed-in role
//! ```

use actix_web::web;

use super::guard::RoleGuard;
use super::{admin, cashier, manager, messages, owner, seller, session, store_keeper};
use crate::domain::Role;

/// Register every portal route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(session::landing)
        .service(session::current_session)
        .service(session::login)
        .service(session::logout)
        .service(
            web::scope("/admin")
                .wrap(RoleGuard::only(Role::Admin))
                .configure(admin::configure),
        )
        .service(
            web::scope("/owner")
                .wrap(RoleGuard::only(Role::Owner))
                .configure(owner::configure),
        )
        .service(
            web::scope("/manager")
                .wrap(RoleGuard::any_of([Role::Manager, Role::Admin]))
                .configure(manager::configure),
        )
        .service(
            web::scope("/cashier")
                .wrap(RoleGuard::only(Role::Cashier))
                .configure(cashier::configure),
        )
        .service(
            web::scope("/seller")
                .wrap(RoleGuard::only(Role::Seller))
                .configure(seller::configure),
        )
        .service(
            web::scope("/store-keeper")
                .wrap(RoleGuard::only(Role::StoreKeeper))
                .configure(store_keeper::configure),
        )
        .service(
            web::scope("/messages")
                .wrap(RoleGuard::any_authenticated())
                .configure(messages::configure),
        );
}
