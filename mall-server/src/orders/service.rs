//! OrderService - Order lifecycle core
//!
//! This module handles:
//! - Order creation (from cart or direct purchase) with price snapshots
//! - Stock reservation via conditional decrement
//! - Status transitions (pay / cancel / ship / complete)
//! - Order detail assembly (header + items + address)
//!
//! # Create Flow
//!
//! ```text
//! create_order(user_id, req)
//!     ├─ 1. Resolve shipping address (owner-scoped)
//!     ├─ 2. Begin IMMEDIATE transaction
//!     ├─ 3. Resolve lines (cart rows or direct input), validate snacks
//!     ├─ 4. Snapshot prices, compute total (integer minor units)
//!     ├─ 5. Insert order (UNPAID) + order items (order_no retried on collision)
//!     ├─ 6. CART_ORDER: delete the consumed cart rows
//!     ├─ 7. Decrement stock per line (conditional, stock >= quantity)
//!     ├─ 8. Commit
//!     └─ 9. Return assembled order detail
//! ```
//!
//! 所有校验失败都发生在任何写操作之前；事务中途的存储失败整体回滚，
//! 购物车和库存保持原状。

use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};

use shared::models::{
    OrderCreateRequest, OrderDetail, OrderLines, OrderStatus, OrderTransition, OrderView, Page,
    Snack,
};
use shared::money::{self, MAX_QUANTITY};
use shared::util::{now_millis, order_no, snowflake_id};

use super::{OrderError, OrderResult};
use crate::db::repository::{RepoError, address, cart, order, snack};

/// 订单号撞号重试上限
const ORDER_NO_ATTEMPTS: u32 = 3;

/// 分页上限
const MAX_PAGE_SIZE: i64 = 100;

/// One resolved order line with snapshotted pricing
struct ResolvedLine {
    snack_id: i64,
    quantity: i64,
    /// 下单时单价（分）
    price: i64,
    snack_name: String,
    snack_image: Option<String>,
}

/// Order lifecycle engine
///
/// Every public operation executes as a single transaction; concurrent
/// operations against the same snack serialize on the conditional stock
/// update, so stock can never go negative.
#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
}

impl OrderService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 创建订单
    ///
    /// 预留库存发生在创建时而非支付时；快照价格不随商品后续改动变化。
    pub async fn create_order(
        &self,
        user_id: i64,
        req: OrderCreateRequest,
    ) -> OrderResult<OrderDetail> {
        tracing::info!(user_id, address_id = req.address_id, "Creating order");

        // 收货地址必须存在且属于下单用户
        address::find_by_id_for_user(&self.pool, req.address_id, user_id)
            .await?
            .ok_or(OrderError::AddressNotFound(req.address_id))?;

        // IMMEDIATE: 校验读和扣库存持同一把写锁，deferred 事务升级会撞 SQLITE_BUSY
        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(RepoError::from)?;

        let (lines, consumed_cart_ids) = match &req.lines {
            OrderLines::Cart { cart_item_ids } => {
                let lines = resolve_cart_lines(&mut *tx, user_id, cart_item_ids).await?;
                (lines, Some(cart_item_ids.clone()))
            }
            OrderLines::Direct { snack_id, quantity } => {
                let line = resolve_direct_line(&mut *tx, *snack_id, *quantity).await?;
                (vec![line], None)
            }
        };

        let total_amount = money::order_total(lines.iter().map(|l| (l.price, l.quantity)))
            .ok_or(OrderError::AmountOverflow)?;

        let now = now_millis();
        let order_id = snowflake_id();

        // 订单号 UNIQUE 撞号时重新生成（概率极低，兜底而已）
        let mut attempt = 0;
        let no = loop {
            attempt += 1;
            let candidate = order_no();
            let new_order = order::NewOrder {
                id: order_id,
                order_no: candidate.clone(),
                user_id,
                address_id: req.address_id,
                total_amount,
                remark: req.remark.clone(),
                create_time: now,
            };
            match order::insert(&mut *tx, &new_order).await {
                Ok(()) => break candidate,
                Err(RepoError::Duplicate(_)) if attempt < ORDER_NO_ATTEMPTS => continue,
                Err(e) => return Err(e.into()),
            }
        };

        for line in &lines {
            let item = order::NewOrderItem {
                id: snowflake_id(),
                order_id,
                snack_id: line.snack_id,
                quantity: line.quantity,
                price: line.price,
                snack_name: line.snack_name.clone(),
                snack_image: line.snack_image.clone(),
                create_time: now,
            };
            order::insert_item(&mut *tx, &item).await?;
        }

        // 购物车下单：消费掉对应购物车行
        if let Some(ids) = &consumed_cart_ids {
            cart::delete_by_ids_for_user(&mut *tx, user_id, ids).await?;
        }

        // 库存预留：条件扣减，零行即并发竞争失败，整个事务回滚
        for line in &lines {
            let affected =
                snack::decrement_stock(&mut *tx, line.snack_id, line.quantity, now).await?;
            if affected == 0 {
                return Err(OrderError::StockUpdateFailed {
                    snack_id: line.snack_id,
                });
            }
        }

        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(order_id, order_no = %no, user_id, total_amount, "Order created");

        self.get_order_detail(order_id, Some(user_id)).await
    }

    /// 订单支付（库存在创建时已预留，无库存变动）
    pub async fn pay_order(&self, order_id: i64, user_id: i64) -> OrderResult<OrderDetail> {
        self.transition_order(order_id, Some(user_id), OrderTransition::Pay)
            .await
    }

    /// 取消订单并恢复库存
    pub async fn cancel_order(&self, order_id: i64, user_id: i64) -> OrderResult<OrderDetail> {
        self.transition_order(order_id, Some(user_id), OrderTransition::Cancel)
            .await
    }

    /// 确认收货
    pub async fn complete_order(&self, order_id: i64, user_id: i64) -> OrderResult<OrderDetail> {
        self.transition_order(order_id, Some(user_id), OrderTransition::Complete)
            .await
    }

    /// 订单发货（管理端，不做归属校验）
    pub async fn ship_order(&self, order_id: i64) -> OrderResult<OrderDetail> {
        self.transition_order(order_id, None, OrderTransition::Ship)
            .await
    }

    /// 状态流转：归属校验 → 状态机校验 → 单事务落库
    ///
    /// 取消时库存恢复与状态变更在同一事务内；任一失败全部回滚。
    async fn transition_order(
        &self,
        order_id: i64,
        owner: Option<i64>,
        transition: OrderTransition,
    ) -> OrderResult<OrderDetail> {
        let order = order::find_by_id(&self.pool, order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;

        if let Some(user_id) = owner
            && order.user_id != user_id
        {
            return Err(OrderError::NotOwner);
        }

        if !order.status.permits(transition) {
            return Err(OrderError::InvalidStateTransition {
                from: order.status,
                action: transition,
            });
        }

        let now = now_millis();
        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(RepoError::from)?;

        if transition == OrderTransition::Cancel {
            // 恢复每个订单项预留的库存
            let items = order::find_items_tx(&mut *tx, order_id).await?;
            for item in &items {
                let affected =
                    snack::increment_stock(&mut *tx, item.snack_id, item.quantity, now).await?;
                if affected == 0 {
                    return Err(OrderError::StockUpdateFailed {
                        snack_id: item.snack_id,
                    });
                }
            }
        }

        let affected =
            order::apply_transition(&mut *tx, order_id, order.status, transition, now).await?;
        if affected == 0 {
            // 校验后状态被并发流转，以事务内的最新状态报告
            let current = order::find_by_id_tx(&mut *tx, order_id)
                .await?
                .map(|o| o.status)
                .unwrap_or(order.status);
            return Err(OrderError::InvalidStateTransition {
                from: current,
                action: transition,
            });
        }

        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(order_id, transition = %transition, "Order transition applied");

        self.get_order_detail(order_id, owner).await
    }

    /// 获取订单详情
    ///
    /// `owner` 为 None 时跳过归属校验（管理端路径，外层需自行做权限控制）。
    pub async fn get_order_detail(
        &self,
        order_id: i64,
        owner: Option<i64>,
    ) -> OrderResult<OrderDetail> {
        let order = order::find_by_id(&self.pool, order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;

        if let Some(user_id) = owner
            && order.user_id != user_id
        {
            return Err(OrderError::NotOwner);
        }

        let items = order::find_items(&self.pool, order_id).await?;
        let address =
            address::find_by_id_for_user(&self.pool, order.address_id, order.user_id).await?;

        Ok(OrderDetail::assemble(order, items, address))
    }

    /// 用户订单分页
    pub async fn page_for_user(
        &self,
        user_id: i64,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> OrderResult<Page<OrderView>> {
        let (limit, offset) = clamp_page(limit, offset);
        let (orders, total) = order::page_by_user(&self.pool, user_id, status, limit, offset).await?;
        Ok(Page::new(
            orders.into_iter().map(OrderView::from).collect(),
            total,
            limit,
            offset,
        ))
    }

    /// 全量订单分页（管理端）
    pub async fn page_all(
        &self,
        status: Option<OrderStatus>,
        order_no_filter: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> OrderResult<Page<OrderView>> {
        let (limit, offset) = clamp_page(limit, offset);
        let (orders, total) =
            order::page_all(&self.pool, status, order_no_filter, limit, offset).await?;
        Ok(Page::new(
            orders.into_iter().map(OrderView::from).collect(),
            total,
            limit,
            offset,
        ))
    }
}

fn clamp_page(limit: i64, offset: i64) -> (i64, i64) {
    (limit.clamp(1, MAX_PAGE_SIZE), offset.max(0))
}

/// 解析购物车订单行
///
/// 解析行数必须与请求 id 数一致，否则视为部分购物车行缺失
/// （不存在或属于其他用户）。
async fn resolve_cart_lines(
    conn: &mut SqliteConnection,
    user_id: i64,
    cart_item_ids: &[i64],
) -> OrderResult<Vec<ResolvedLine>> {
    if cart_item_ids.is_empty() {
        return Err(OrderError::CartItemsMissing);
    }

    let cart_lines = cart::find_by_ids_for_user(conn, user_id, cart_item_ids).await?;
    if cart_lines.len() != cart_item_ids.len() {
        return Err(OrderError::CartItemsMissing);
    }

    let snack_ids: Vec<i64> = cart_lines.iter().map(|c| c.snack_id).collect();
    let snacks = snack::find_by_ids_tx(conn, &snack_ids).await?;
    let by_id: HashMap<i64, Snack> = snacks.into_iter().map(|s| (s.id, s)).collect();

    let mut lines = Vec::with_capacity(cart_lines.len());
    for cart_line in &cart_lines {
        let snack = by_id
            .get(&cart_line.snack_id)
            .ok_or(OrderError::ItemNotFound(cart_line.snack_id))?;
        lines.push(resolve_line(snack, cart_line.quantity)?);
    }
    Ok(lines)
}

/// 解析直接购买订单行
async fn resolve_direct_line(
    conn: &mut SqliteConnection,
    snack_id: i64,
    quantity: i64,
) -> OrderResult<ResolvedLine> {
    let snack = snack::find_by_id_tx(conn, snack_id)
        .await?
        .ok_or(OrderError::ItemNotFound(snack_id))?;
    resolve_line(&snack, quantity)
}

/// 校验单行：数量、上架状态、库存，并快照价格/名称/图片
fn resolve_line(snack: &Snack, quantity: i64) -> OrderResult<ResolvedLine> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(OrderError::InvalidQuantity);
    }
    if !snack.is_on_sale() {
        return Err(OrderError::ItemUnavailable {
            name: snack.name.clone(),
        });
    }
    if snack.stock < quantity {
        return Err(OrderError::InsufficientStock {
            name: snack.name.clone(),
            available: snack.stock,
            requested: quantity,
        });
    }
    Ok(ResolvedLine {
        snack_id: snack.id,
        quantity,
        price: snack.price,
        snack_name: snack.name.clone(),
        snack_image: snack.cover_image.clone(),
    })
}
