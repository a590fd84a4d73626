//! Order submission body for `POST /order` and `POST /orders`.

use serde::{Deserialize, Serialize};

use crate::signing::{SignedOrder, WireOrder};
use crate::types::OrderType;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostOrderRequest {
    pub order: WireOrder,
    /// API key of the submitting account.
    pub owner: String,
    #[serde(rename = "orderType")]
    pub order_type: OrderType,
    #[serde(rename = "deferExec")]
    pub defer_exec: bool,
    #[serde(rename = "postOnly", skip_serializing_if = "Option::is_none", default)]
    pub post_only: Option<bool>,
}

impl PostOrderRequest {
    /// Post-only is only meaningful for orders that rest on the book, so it
    /// is rejected for FOK and FAK.
    pub fn new(
        order: &SignedOrder,
        owner: impl Into<String>,
        order_type: OrderType,
        defer_exec: bool,
        post_only: Option<bool>,
    ) -> Result<Self> {
        if post_only == Some(true) && order_type.is_immediate() {
            return Err(Error::InvalidArgument(format!(
                "postOnly is only supported for GTC and GTD orders, got {}",
                order_type
            )));
        }
        Ok(Self {
            order: order.to_wire(),
            owner: owner.into(),
            order_type,
            defer_exec,
            post_only,
        })
    }
}
