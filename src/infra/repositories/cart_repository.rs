//! Cart repository: cart headers and their lines, without product data.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::entities::cart::{self, Entity as CartEntity};
use super::entities::cart_item::{self, Entity as CartItemEntity};
use crate::domain::CartOwner;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, PartialEq)]
pub struct CartRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl From<cart::Model> for CartRecord {
    fn from(model: cart::Model) -> Self {
        Self {
            id: model.id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<cart_item::Model> for CartLine {
    fn from(model: cart_item::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            quantity: model.quantity,
            created_at: model.created_at,
        }
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn find_or_create(&self, owner: CartOwner) -> AppResult<CartRecord>;

    /// Lines in insertion order
    async fn lines(&self, cart_id: Uuid) -> AppResult<Vec<CartLine>>;

    async fn find_line(&self, cart_id: Uuid, item_id: Uuid) -> AppResult<Option<CartLine>>;

    async fn find_line_for_product(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<CartLine>>;

    /// Insert the line or overwrite the quantity of the existing one
    async fn put_line(&self, cart_id: Uuid, product_id: Uuid, quantity: i32)
        -> AppResult<CartLine>;

    async fn remove_line(&self, cart_id: Uuid, item_id: Uuid) -> AppResult<()>;

    async fn clear(&self, cart_id: Uuid) -> AppResult<()>;
}

pub struct CartStore {
    db: DatabaseConnection,
}

impl CartStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn touch(&self, cart_id: Uuid) -> AppResult<()> {
        CartEntity::update_many()
            .col_expr(
                cart::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(Utc::now()),
            )
            .filter(cart::Column::Id.eq(cart_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn find_owned(&self, owner: &CartOwner) -> AppResult<Option<cart::Model>> {
        let query = match owner {
            CartOwner::Customer(id) => CartEntity::find().filter(cart::Column::CustomerId.eq(*id)),
            CartOwner::Session(session) => {
                CartEntity::find().filter(cart::Column::SessionId.eq(session.as_str()))
            }
        };
        Ok(query.one(&self.db).await?)
    }
}

#[async_trait]
impl CartRepository for CartStore {
    async fn find_or_create(&self, owner: CartOwner) -> AppResult<CartRecord> {
        if let Some(model) = self.find_owned(&owner).await? {
            return Ok(model.into());
        }

        let owner_column = match owner {
            CartOwner::Customer(_) => cart::Column::CustomerId,
            CartOwner::Session(_) => cart::Column::SessionId,
        };
        let now = Utc::now();
        let inserted = CartEntity::insert(cart::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(owner.customer_id()),
            session_id: Set(owner.session_id().map(str::to_string)),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .on_conflict(OnConflict::column(owner_column).do_nothing().to_owned())
        .exec_without_returning(&self.db)
        .await?;

        // A concurrent request may have created it first
        let model = self
            .find_owned(&owner)
            .await?
            .ok_or_else(|| AppError::internal("Cart missing after insert"))?;
        if inserted > 0 {
            tracing::debug!(cart_id = %model.id, "Created cart");
        }
        Ok(model.into())
    }

    async fn lines(&self, cart_id: Uuid) -> AppResult<Vec<CartLine>> {
        let models = CartItemEntity::find()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .order_by_asc(cart_item::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(CartLine::from).collect())
    }

    async fn find_line(&self, cart_id: Uuid, item_id: Uuid) -> AppResult<Option<CartLine>> {
        let result = CartItemEntity::find_by_id(item_id)
            .filter(cart_item::Column::CartId.eq(cart_id))
            .one(&self.db)
            .await?;

        Ok(result.map(CartLine::from))
    }

    async fn find_line_for_product(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<CartLine>> {
        let result = CartItemEntity::find()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .filter(cart_item::Column::ProductId.eq(product_id))
            .one(&self.db)
            .await?;

        Ok(result.map(CartLine::from))
    }

    async fn put_line(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<CartLine> {
        let now = Utc::now();
        let line = cart_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            cart_id: Set(cart_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = CartItemEntity::insert(line)
            .on_conflict(
                OnConflict::columns([cart_item::Column::CartId, cart_item::Column::ProductId])
                    .update_columns([cart_item::Column::Quantity, cart_item::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await?;

        self.touch(cart_id).await?;
        Ok(model.into())
    }

    async fn remove_line(&self, cart_id: Uuid, item_id: Uuid) -> AppResult<()> {
        let result = CartItemEntity::delete_many()
            .filter(cart_item::Column::Id.eq(item_id))
            .filter(cart_item::Column::CartId.eq(cart_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Cart item"));
        }
        self.touch(cart_id).await
    }

    async fn clear(&self, cart_id: Uuid) -> AppResult<()> {
        CartItemEntity::delete_many()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .exec(&self.db)
            .await?;

        self.touch(cart_id).await
    }
}
