//! 实体类型
//!
//! 本服务眼中的下游数据模型。所有行都存在下游数据库里；这里只定义
//! 编排层读写用到的形状：行类型、请求载荷和写入载荷分开，写入载荷里
//! 刻意不暴露所有权和计数器字段，杜绝客户端伪造。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// =============================================================================
// Lifecycle
// =============================================================================

/// 食品和预订共享的生命周期状态
///
/// 状态机: `active → cancelled`, `active → completed`；
/// 进入终态后拒绝任何再次转换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStatus {
    Active,
    Cancelled,
    Completed,
}

impl LifecycleStatus {
    /// 是否终态 (cancelled / completed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

// =============================================================================
// Role
// =============================================================================

/// 调用者角色，从 profile 行解析
///
/// 通知按接收方角色路由到两张平行表；角色作为枚举变体选择
/// (表, 过滤列) 对，把"一种能力按角色参数化"收敛成一个操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Restaurant,
    Customer,
}

impl Role {
    /// 解析档案行里的角色值，未识别的值返回 `None`
    pub fn from_profile(value: &str) -> Option<Self> {
        match value {
            "restaurant" => Some(Self::Restaurant),
            "customer" => Some(Self::Customer),
            _ => None,
        }
    }

    /// 此角色收通知的表
    pub fn notifications_table(&self) -> &'static str {
        match self {
            Self::Restaurant => "notifications_restaurant",
            Self::Customer => "notifications_customer",
        }
    }

    /// 通知表里标识接收方的过滤列
    pub fn owner_column(&self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant_id",
            Self::Customer => "customer_id",
        }
    }
}

// =============================================================================
// Item
// =============================================================================

/// 食品行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    /// 拥有此食品的餐厅 (= 创建者的用户 ID)
    pub restaurant_id: Uuid,
    pub information: String,
    pub price: f64,
    pub pickup_time: String,
    pub total_spots: i32,
    /// 派生计数器，只通过专用 RPC 增减，本服务从不直接写
    pub num_of_reservations: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: LifecycleStatus,
}

impl Item {
    /// 剩余可预订名额
    pub fn available_spots(&self) -> i32 {
        self.total_spots - self.num_of_reservations
    }
}

/// POST /items 请求载荷
///
/// `restaurant_id` 故意不在这里：一律取调用者身份
#[derive(Debug, Deserialize, Validate)]
pub struct ItemCreate {
    #[validate(length(min = 1, max = 500))]
    pub information: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(length(min = 1, max = 100))]
    pub pickup_time: String,
    #[validate(range(min = 1))]
    pub total_spots: i32,
    #[validate(length(max = 2048))]
    pub image_url: Option<String>,
}

/// 食品创建时发给下游的行
#[derive(Debug, Serialize)]
pub struct ItemInsert {
    pub restaurant_id: Uuid,
    pub information: String,
    pub price: f64,
    pub pickup_time: String,
    pub total_spots: i32,
    pub num_of_reservations: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: LifecycleStatus,
}

impl ItemInsert {
    /// 从创建载荷构造下游行，所有权一律指向调用者
    pub fn from_payload(restaurant_id: Uuid, payload: ItemCreate) -> Self {
        Self {
            restaurant_id,
            information: payload.information,
            price: payload.price,
            pickup_time: payload.pickup_time,
            total_spots: payload.total_spots,
            num_of_reservations: 0,
            image_url: payload.image_url,
            status: LifecycleStatus::Active,
        }
    }
}

/// PATCH /items/{id} 请求载荷
///
/// 所有权和计数器字段不在这里，补丁永远带不动它们
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct ItemUpdate {
    #[validate(length(min = 1, max = 500))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[validate(length(min = 1, max = 100))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    /// 可以被改到低于当前 `num_of_reservations`；可用名额检查只在
    /// 预订创建时执行，已有预订不受影响
    #[validate(range(min = 1))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_spots: Option<i32>,
    #[validate(length(max = 2048))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// =============================================================================
// Reservation
// =============================================================================

/// 预订行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub item_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub status: LifecycleStatus,
    pub quantity: i32,
}

/// GET /reservations 返回行 (内嵌父食品)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationWithItem {
    #[serde(flatten)]
    pub reservation: Reservation,
    /// `select=*,item:items(*)` 内嵌的父食品行
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
}

/// POST /reservations 请求载荷
///
/// `customer_id` 故意不在这里：一律取调用者身份
#[derive(Debug, Deserialize)]
pub struct ReservationCreate {
    pub item_id: Uuid,
    pub quantity: i32,
    /// 省略时取服务器当前时间
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// 预订创建时发给下游的行
#[derive(Debug, Serialize)]
pub struct ReservationInsert {
    pub customer_id: Uuid,
    pub item_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub status: LifecycleStatus,
    pub quantity: i32,
}

// =============================================================================
// Notification
// =============================================================================

/// 通知行 (两张平行表共用一个形状，接收方列按表可空)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

/// 通知插入载荷
#[derive(Debug, Serialize)]
pub struct NotificationInsert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub read: bool,
}

impl NotificationInsert {
    /// 顾客取消预订 → 通知餐厅
    pub fn reservation_cancelled(
        restaurant_id: Uuid,
        reservation: &Reservation,
        item: &Item,
    ) -> Self {
        Self {
            restaurant_id: Some(restaurant_id),
            customer_id: Some(reservation.customer_id),
            reservation_id: Some(reservation.id),
            kind: "reservation_cancelled".into(),
            message: format!(
                "A reservation of {} for '{}' was cancelled by the customer",
                reservation.quantity, item.information
            ),
            read: false,
        }
    }

    /// 餐厅关闭食品 → 逐个通知受影响的顾客
    pub fn item_closed(reservation: &Reservation, item: &Item, status: LifecycleStatus) -> Self {
        let (kind, verb) = match status {
            LifecycleStatus::Completed => ("item_completed", "marked as completed"),
            _ => ("item_cancelled", "cancelled"),
        };
        Self {
            restaurant_id: None,
            customer_id: Some(reservation.customer_id),
            reservation_id: Some(reservation.id),
            kind: kind.into(),
            message: format!("'{}' was {} by the restaurant", item.information, verb),
            read: false,
        }
    }
}

// =============================================================================
// Profile
// =============================================================================

/// 用户档案行；本服务只读写，从不创建
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    /// 角色决定通知路由；按原始字符串保留，消费方用 [`Role::from_profile`] 解析
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// PATCH /profile 请求载荷 (`user_id` 和 `role` 不可补丁)
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 200))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[validate(length(max = 2048))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// 头像子资源的读写形状
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfilePicture {
    pub profile_picture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&LifecycleStatus::Active).unwrap(),
            "\"active\""
        );
        let status: LifecycleStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, LifecycleStatus::Cancelled);
    }

    #[test]
    fn test_lifecycle_status_terminal() {
        assert!(!LifecycleStatus::Active.is_terminal());
        assert!(LifecycleStatus::Cancelled.is_terminal());
        assert!(LifecycleStatus::Completed.is_terminal());
    }

    #[test]
    fn test_role_table_routing() {
        assert_eq!(
            Role::Restaurant.notifications_table(),
            "notifications_restaurant"
        );
        assert_eq!(Role::Restaurant.owner_column(), "restaurant_id");
        assert_eq!(
            Role::Customer.notifications_table(),
            "notifications_customer"
        );
        assert_eq!(Role::Customer.owner_column(), "customer_id");
    }

    #[test]
    fn test_available_spots() {
        let item = Item {
            id: Uuid::new_v4(),
            restaurant_id: Uuid::new_v4(),
            information: "Surprise bag".into(),
            price: 4.5,
            pickup_time: "18:00-19:00".into(),
            total_spots: 5,
            num_of_reservations: 3,
            image_url: None,
            status: LifecycleStatus::Active,
        };
        assert_eq!(item.available_spots(), 2);
    }

    #[test]
    fn test_item_insert_overwrites_ownership() {
        let caller = Uuid::new_v4();
        let payload = ItemCreate {
            information: "Bread box".into(),
            price: 3.0,
            pickup_time: "20:00".into(),
            total_spots: 4,
            image_url: None,
        };

        let row = ItemInsert::from_payload(caller, payload);
        assert_eq!(row.restaurant_id, caller);
        assert_eq!(row.num_of_reservations, 0);
        assert_eq!(row.status, LifecycleStatus::Active);
    }

    #[test]
    fn test_item_update_skips_absent_fields() {
        let patch = ItemUpdate {
            price: Some(2.5),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "price": 2.5 }));
    }

    #[test]
    fn test_notification_kind_serializes_as_type() {
        let insert = NotificationInsert {
            restaurant_id: None,
            customer_id: Some(Uuid::new_v4()),
            reservation_id: None,
            kind: "item_cancelled".into(),
            message: "gone".into(),
            read: false,
        };
        let json = serde_json::to_value(&insert).unwrap();
        assert_eq!(json["type"], "item_cancelled");
        assert!(json.get("restaurant_id").is_none());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from_profile("restaurant"), Some(Role::Restaurant));
        assert_eq!(Role::from_profile("customer"), Some(Role::Customer));
        assert_eq!(Role::from_profile("admin"), None);
        assert_eq!(Role::from_profile(""), None);
    }
}
