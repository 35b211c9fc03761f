//! # Resource Ownership Guard
//!
//! A pure decision over already-fetched records: callers load the resource, then ask
//! [`OwnershipGuard::authorize`] whether the caller may perform the action. Nothing here
//! touches a store.
//!
//! | Action | Allowed for |
//! |---|---|
//! | restaurant and menu writes, dashboard, order listing, rider assignment | restaurant owner |
//! | read an order | diner, restaurant owner, assigned rider |
//! | change an order at all | restaurant owner, assigned rider |
//! | move an order to `confirmed`, `preparing`, `cancelled` | restaurant owner |
//! | move an order to `out_for_delivery`, `delivered` | assigned rider |
//!
//! A missing resource is `NotFound`, never `NotAuthorized`. Existence is not hidden from
//! unauthorized callers.

use crate::error::PlatformError;
use crate::model::{MenuItem, Order, OrderStatus, Restaurant, UserId};
use std::fmt::Display;
use tracing::warn;

/// What the caller wants to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedAction {
    UpdateRestaurant,
    DeleteRestaurant,
    AddMenuItem,
    UpdateMenuItem,
    DeleteMenuItem,
    ViewDashboard,
    ViewOrders,
    ReadOrder,
    AssignRider,
    /// Any order change. Checked before the target status is known to be reachable.
    MutateOrder,
    Transition(OrderStatus),
}

impl GuardedAction {
    /// The kind of record this action targets.
    pub fn target_kind(self) -> &'static str {
        match self {
            GuardedAction::UpdateMenuItem | GuardedAction::DeleteMenuItem => "menu item",
            GuardedAction::ReadOrder
            | GuardedAction::AssignRider
            | GuardedAction::MutateOrder
            | GuardedAction::Transition(_) => "order",
            _ => "restaurant",
        }
    }
}

/// A fetched resource together with whatever it needs to resolve its owner.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Restaurant(&'a Restaurant),
    MenuItem {
        item: &'a MenuItem,
        restaurant: &'a Restaurant,
    },
    Order {
        order: &'a Order,
        restaurant: &'a Restaurant,
    },
}

impl Resource<'_> {
    /// Owner of the restaurant this resource belongs to, if the link is consistent.
    fn owner_id(&self) -> Option<UserId> {
        match self {
            Resource::Restaurant(restaurant) => Some(restaurant.owner_id),
            Resource::MenuItem { item, restaurant } => {
                (item.restaurant_id == restaurant.id).then_some(restaurant.owner_id)
            }
            Resource::Order { order, restaurant } => {
                (order.restaurant_id == restaurant.id).then_some(restaurant.owner_id)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    NotFound,
    NotAuthorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(DenialReason),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allowed
    }

    fn allow_if(condition: bool) -> Self {
        if condition {
            Decision::Allowed
        } else {
            Decision::Denied(DenialReason::NotAuthorized)
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipGuard;

impl OwnershipGuard {
    pub fn authorize(
        &self,
        caller: UserId,
        resource: Option<Resource<'_>>,
        action: GuardedAction,
    ) -> Decision {
        let Some(resource) = resource else {
            return Decision::Denied(DenialReason::NotFound);
        };
        let is_owner = resource.owner_id() == Some(caller);

        match action {
            GuardedAction::ReadOrder => match resource {
                Resource::Order { order, .. } => Decision::allow_if(
                    is_owner || order.diner_id == caller || order.rider_id == Some(caller),
                ),
                _ => Decision::Denied(DenialReason::NotAuthorized),
            },
            GuardedAction::MutateOrder => match resource {
                Resource::Order { order, .. } => {
                    Decision::allow_if(is_owner || order.rider_id == Some(caller))
                }
                _ => Decision::Denied(DenialReason::NotAuthorized),
            },
            GuardedAction::AssignRider => match resource {
                Resource::Order { .. } => Decision::allow_if(is_owner),
                _ => Decision::Denied(DenialReason::NotAuthorized),
            },
            GuardedAction::Transition(next) => match resource {
                Resource::Order { order, .. } => match next {
                    OrderStatus::Confirmed | OrderStatus::Preparing | OrderStatus::Cancelled => {
                        Decision::allow_if(is_owner)
                    }
                    OrderStatus::OutForDelivery | OrderStatus::Delivered => {
                        Decision::allow_if(order.rider_id == Some(caller))
                    }
                    OrderStatus::Created | OrderStatus::Pending => {
                        Decision::Denied(DenialReason::NotAuthorized)
                    }
                },
                _ => Decision::Denied(DenialReason::NotAuthorized),
            },
            GuardedAction::UpdateMenuItem | GuardedAction::DeleteMenuItem => match resource {
                Resource::MenuItem { .. } => Decision::allow_if(is_owner),
                _ => Decision::Denied(DenialReason::NotAuthorized),
            },
            GuardedAction::UpdateRestaurant
            | GuardedAction::DeleteRestaurant
            | GuardedAction::AddMenuItem
            | GuardedAction::ViewDashboard
            | GuardedAction::ViewOrders => match resource {
                Resource::Restaurant(_) => Decision::allow_if(is_owner),
                _ => Decision::Denied(DenialReason::NotAuthorized),
            },
        }
    }

    /// [`authorize`](Self::authorize), turned into the caller-facing error.
    pub fn enforce(
        &self,
        caller: UserId,
        resource: Option<Resource<'_>>,
        action: GuardedAction,
        target: impl Display,
    ) -> Result<(), PlatformError> {
        match self.authorize(caller, resource, action) {
            Decision::Allowed => Ok(()),
            Decision::Denied(DenialReason::NotFound) => {
                Err(PlatformError::not_found(action.target_kind(), target))
            }
            Decision::Denied(DenialReason::NotAuthorized) => {
                warn!(%caller, ?action, %target, "Access denied");
                Err(PlatformError::NotAuthorized(format!(
                    "{caller} may not {action:?} on {target}"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::model::{
        LineItem, MenuItemId, OrderId, PaymentMethod, PaymentStatus, RestaurantId,
    };
    use chrono::DateTime;

    const OWNER: UserId = UserId(1);
    const DINER: UserId = UserId(2);
    const RIDER: UserId = UserId(3);
    const STRANGER: UserId = UserId(4);

    fn restaurant() -> Restaurant {
        Restaurant {
            id: RestaurantId(1),
            owner_id: OWNER,
            name: "Lotus".into(),
            description: String::new(),
            cuisine: "Thai".into(),
            is_active: true,
            rating: 0.0,
            review_count: 0,
        }
    }

    fn order(rider: Option<UserId>) -> Order {
        let at = DateTime::from_timestamp(0, 0).unwrap();
        Order {
            id: OrderId(1),
            restaurant_id: RestaurantId(1),
            diner_id: DINER,
            rider_id: rider,
            items: vec![LineItem {
                menu_item_id: MenuItemId(1),
                name: "Noodles".into(),
                quantity: 1,
                unit_price: 100,
            }],
            subtotal: 100,
            delivery_fee: 0,
            tax: 0,
            total_amount: 100,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: PaymentMethod::Card,
            delivery_address: "1 Main St".into(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn only_the_owner_writes_restaurant_scoped_resources() {
        let guard = OwnershipGuard;
        let r = restaurant();
        let item = MenuItem {
            id: MenuItemId(1),
            restaurant_id: r.id,
            name: "Soup".into(),
            category: "Starters".into(),
            price: 100,
            is_available: true,
        };

        for action in [
            GuardedAction::UpdateRestaurant,
            GuardedAction::DeleteRestaurant,
            GuardedAction::AddMenuItem,
            GuardedAction::ViewDashboard,
            GuardedAction::ViewOrders,
        ] {
            let res = Some(Resource::Restaurant(&r));
            assert!(guard.authorize(OWNER, res, action).is_allowed());
            for caller in [DINER, RIDER, STRANGER] {
                assert_eq!(
                    guard.authorize(caller, res, action),
                    Decision::Denied(DenialReason::NotAuthorized)
                );
            }
        }

        for action in [GuardedAction::UpdateMenuItem, GuardedAction::DeleteMenuItem] {
            let res = Some(Resource::MenuItem {
                item: &item,
                restaurant: &r,
            });
            assert!(guard.authorize(OWNER, res, action).is_allowed());
            assert!(!guard.authorize(STRANGER, res, action).is_allowed());
        }
    }

    #[test]
    fn menu_item_from_another_restaurant_is_refused() {
        let r = restaurant();
        let item = MenuItem {
            id: MenuItemId(1),
            restaurant_id: RestaurantId(99),
            name: "Soup".into(),
            category: "Starters".into(),
            price: 100,
            is_available: true,
        };
        let res = Some(Resource::MenuItem {
            item: &item,
            restaurant: &r,
        });
        assert!(!OwnershipGuard
            .authorize(OWNER, res, GuardedAction::UpdateMenuItem)
            .is_allowed());
    }

    #[test]
    fn missing_resource_is_not_found() {
        let err = OwnershipGuard
            .enforce(STRANGER, None, GuardedAction::ReadOrder, OrderId(7))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.to_string(), "order not found: order_7");
    }

    #[test]
    fn order_reads_belong_to_the_three_parties() {
        let r = restaurant();
        let o = order(Some(RIDER));
        let res = Some(Resource::Order {
            order: &o,
            restaurant: &r,
        });
        for caller in [OWNER, DINER, RIDER] {
            assert!(OwnershipGuard
                .authorize(caller, res, GuardedAction::ReadOrder)
                .is_allowed());
        }
        assert!(!OwnershipGuard
            .authorize(STRANGER, res, GuardedAction::ReadOrder)
            .is_allowed());
    }

    #[test]
    fn transitions_split_between_owner_and_rider() {
        let guard = OwnershipGuard;
        let r = restaurant();
        let o = order(Some(RIDER));
        let res = Some(Resource::Order {
            order: &o,
            restaurant: &r,
        });
        let can = |caller, next| {
            guard
                .authorize(caller, res, GuardedAction::Transition(next))
                .is_allowed()
        };

        assert!(can(OWNER, OrderStatus::Confirmed));
        assert!(can(OWNER, OrderStatus::Preparing));
        assert!(can(OWNER, OrderStatus::Cancelled));
        assert!(!can(OWNER, OrderStatus::Delivered));

        assert!(can(RIDER, OrderStatus::OutForDelivery));
        assert!(can(RIDER, OrderStatus::Delivered));
        assert!(!can(RIDER, OrderStatus::Confirmed));

        assert!(!can(DINER, OrderStatus::Cancelled));
        assert!(!can(OWNER, OrderStatus::Pending));
    }

    #[test]
    fn order_changes_belong_to_owner_and_assigned_rider() {
        let r = restaurant();
        let o = order(Some(RIDER));
        let res = Some(Resource::Order {
            order: &o,
            restaurant: &r,
        });
        for caller in [OWNER, RIDER] {
            assert!(OwnershipGuard
                .authorize(caller, res, GuardedAction::MutateOrder)
                .is_allowed());
        }
        for caller in [DINER, STRANGER] {
            assert_eq!(
                OwnershipGuard.authorize(caller, res, GuardedAction::MutateOrder),
                Decision::Denied(DenialReason::NotAuthorized)
            );
        }
    }

    #[test]
    fn unassigned_order_has_no_rider_rights() {
        let r = restaurant();
        let o = order(None);
        let res = Some(Resource::Order {
            order: &o,
            restaurant: &r,
        });
        let err = OwnershipGuard
            .enforce(
                RIDER,
                res,
                GuardedAction::Transition(OrderStatus::OutForDelivery),
                o.id,
            )
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotAuthorized);
    }
}
