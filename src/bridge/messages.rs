//! JSON message contracts for the intake and notification boundaries.
//!
//! Shopping lists arrive as a JSON array of item-name strings, or of
//! `{"en": .., "ja": ..}` objects when bilingual; the planner consumes the
//! English/canonical field, the checklist consumes the display field. The
//! same intake channel also carries the payment-completed signal as an
//! object with an `"action"` field, so [`parse_intake`] routes between the
//! two shapes. Outbound, [`CartUpdateMsg`] is the cart/scan notification
//! consumed by the UI layer.

use crate::error::{CartError, Result};
use crate::list::ShoppingItem;
use crate::scanner::CartState;
use serde::{Deserialize, Serialize};

/// One raw shopping-list element off the wire.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawListItem {
    Plain(String),
    Bilingual { en: String, ja: String },
}

/// Inbound message on the intake boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeMessage {
    /// A shopping list to execute.
    List(Vec<ShoppingItem>),
    /// Checkout confirmed; total in whole yen.
    PaymentCompleted { total: u32 },
}

/// Action-object shape shared by non-list intake messages.
#[derive(Debug, Deserialize)]
struct ActionMsg {
    action: String,
    #[serde(default)]
    total: Option<u32>,
}

/// Parse a shopping-list payload.
///
/// Rejects anything that is not an array of strings or of `{en, ja}`
/// objects with [`CartError::MalformedList`]; the submission then never
/// starts a trip.
pub fn parse_shopping_list(payload: &str) -> Result<Vec<ShoppingItem>> {
    let raw: Vec<RawListItem> = serde_json::from_str(payload)?;
    Ok(raw
        .into_iter()
        .map(|item| match item {
            RawListItem::Plain(name) => ShoppingItem::monolingual(name),
            RawListItem::Bilingual { en, ja } => ShoppingItem::bilingual(en, ja),
        })
        .collect())
}

/// Parse any intake payload: payment signal or shopping list.
pub fn parse_intake(payload: &str) -> Result<IntakeMessage> {
    if let Ok(action) = serde_json::from_str::<ActionMsg>(payload) {
        return match action.action.as_str() {
            "payment_completed" => Ok(IntakeMessage::PaymentCompleted {
                total: action.total.unwrap_or(0),
            }),
            other => Err(CartError::MalformedList(format!(
                "unknown action '{}'",
                other
            ))),
        };
    }

    parse_shopping_list(payload).map(IntakeMessage::List)
}

/// One cart line in the cart-update notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLineMsg {
    pub name: String,
    pub price: u32,
}

/// Cart/scan updated notification (fire-and-forget to the UI).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartUpdateMsg {
    pub latest_item: String,
    pub total_price: u32,
    pub item_count: u32,
    pub items: Vec<CartLineMsg>,
}

impl CartUpdateMsg {
    /// Build the notification for the cart after the given latest item.
    pub fn from_cart(latest_item: &str, cart: &CartState) -> Self {
        Self {
            latest_item: latest_item.to_string(),
            total_price: cart.total_price(),
            item_count: cart.item_count() as u32,
            items: cart
                .items()
                .iter()
                .map(|i| CartLineMsg {
                    name: i.name.clone(),
                    price: i.price,
                })
                .collect(),
        }
    }
}

/// Payment-completed signal, published once per checkout confirmation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentMsg {
    pub action: String,
    pub total: u32,
}

impl PaymentMsg {
    pub fn new(total: u32) -> Self {
        Self {
            action: "payment_completed".to_string(),
            total,
        }
    }
}
