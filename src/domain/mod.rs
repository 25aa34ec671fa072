//! Domain layer - Core business entities and logic
//!
//! This module contains the marketplace's domain models, independent of
//! infrastructure concerns: entities, value objects, query filters and
//! the validation rules that guard them.

/// Declares a lowercase string-backed enum with `as_str`, `Display` and a
/// strict `FromStr` that reports unknown values as validation errors.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize, utoipa::ToSchema,
        )]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::errors::AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(crate::errors::AppError::validation(format!(
                        "Invalid {} '{}'",
                        $label, other
                    ))),
                }
            }
        }
    };
}

pub mod address;
pub mod cart;
pub mod category;
pub mod checkout;
pub mod order;
pub mod password;
pub mod product;
pub mod review;
pub mod user;
pub mod vendor;

pub use address::Address;
pub use cart::{AddCartItem, Cart, CartItem, CartOwner, UpdateCartItem};
pub use category::{slugify, Category, CategoryInput};
pub use checkout::{
    CheckoutAddress, CheckoutItem, CheckoutRequest, CheckoutSession, CustomerInfo, WebhookEvent,
    WebhookEventData,
};
pub use order::{
    Order, OrderItem, OrderStatus, OrderStatusFilter, OrderStatusUpdate, PaymentStatus,
};
pub use password::Password;
pub use product::{
    featured_limit, Dimensions, Product, ProductFilter, ProductInput, ProductLookup,
    ProductOrdering, ProductStatus, Seo, SortDirection, SortField,
};
pub use review::{Review, ReviewChanges, ReviewInput};
pub use user::{NewUser, ProfileChanges, User, UserResponse, UserRole, UserStatus};
pub use vendor::{Vendor, VendorProfile, VendorStatus};
