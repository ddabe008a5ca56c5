use chrono::Utc;
use metrics::counter;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::{
    config::AppConfig,
    db::DatabaseAccess,
    errors::ServiceError,
    repositories::{CatalogRepository, NewLineItem, OrderRepository},
};

const DEFAULT_MIN_LINES: usize = 1;
const DEFAULT_INITIAL_STATUS: &str = "New";

/// A purchase order as submitted by a caller
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderRequest {
    /// Client placing the order
    #[serde(default, alias = "client_id")]
    #[schema(example = 1)]
    pub client_id: Option<i32>,
    /// Requested lines, in the order they should be numbered
    #[serde(default)]
    pub lines: Option<Vec<OrderLineRequest>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    /// Part number
    #[serde(default, alias = "part_no")]
    #[schema(example = 1)]
    pub part_no: Option<i32>,
    /// Quantity ordered; must be a positive integer
    #[serde(default)]
    #[schema(example = 10)]
    pub qty: Option<i64>,
}

impl OrderLineRequest {
    pub fn new(part_no: i32, qty: i64) -> Self {
        Self {
            part_no: Some(part_no),
            qty: Some(qty),
        }
    }
}

/// Result of a committed submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedOrder {
    /// Number of the newly created purchase order
    #[schema(example = 42)]
    pub po_no: i32,
}

/// A request line that passed its shape checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLine {
    /// 1-based position in the request, which becomes the line number
    pub line_no: usize,
    pub part_id: i32,
    pub qty: i32,
}

/// Checks one request line in isolation. `line_no` is 1-based.
pub fn parse_line(line_no: usize, line: &OrderLineRequest) -> Result<ParsedLine, ServiceError> {
    let invalid = |reason: &str| ServiceError::InvalidLine {
        line: line_no,
        reason: reason.to_string(),
    };

    let part_id = line.part_no.ok_or_else(|| invalid("partNo is required"))?;
    let qty = line.qty.ok_or_else(|| invalid("qty is required"))?;

    if qty <= 0 {
        return Err(invalid("qty must be a positive integer"));
    }
    let qty = i32::try_from(qty).map_err(|_| invalid("qty is too large"))?;

    Ok(ParsedLine {
        line_no,
        part_id,
        qty,
    })
}

/// Checks the request envelope before any database work
fn check_envelope(
    request: &SubmitOrderRequest,
    min_lines: usize,
) -> Result<(i32, Vec<OrderLineRequest>), ServiceError> {
    let lines = match &request.lines {
        Some(lines) if lines.len() >= min_lines && !lines.is_empty() => lines.clone(),
        Some(lines) => {
            return Err(ServiceError::InvalidRequest(format!(
                "at least {} line(s) required, got {}",
                min_lines.max(1),
                lines.len()
            )))
        }
        None => return Err(ServiceError::InvalidRequest("lines are required".into())),
    };

    let client_id = request
        .client_id
        .ok_or_else(|| ServiceError::InvalidRequest("clientId is required".into()))?;

    Ok((client_id, lines))
}

/// Tracks how many units of each part the lines seen so far ask for
#[derive(Debug, Default)]
struct DemandLedger {
    requested: HashMap<i32, i64>,
}

impl DemandLedger {
    /// Adds `qty` for `part_id` and returns the running total
    fn add(&mut self, part_id: i32, qty: i32) -> i64 {
        let total = self.requested.entry(part_id).or_insert(0);
        *total += i64::from(qty);
        *total
    }
}

/// Validates and records purchase orders.
///
/// A submission either commits in full (header, every line, stock
/// decrements and the client balance) or leaves the store untouched.
#[derive(Clone)]
pub struct OrderSubmissionService {
    db: DatabaseAccess,
    min_lines: usize,
    initial_status: String,
}

impl OrderSubmissionService {
    /// Creates a service with the default policy (one line minimum, status `New`)
    pub fn new(db_pool: Arc<DatabaseConnection>) -> Self {
        Self {
            db: DatabaseAccess::new(db_pool),
            min_lines: DEFAULT_MIN_LINES,
            initial_status: DEFAULT_INITIAL_STATUS.to_string(),
        }
    }

    pub fn from_config(db_pool: Arc<DatabaseConnection>, config: &AppConfig) -> Self {
        Self::new(db_pool)
            .with_min_lines(config.order_min_lines)
            .with_initial_status(config.order_initial_status.clone())
    }

    pub fn with_min_lines(mut self, min_lines: usize) -> Self {
        self.min_lines = min_lines.max(1);
        self
    }

    pub fn with_initial_status(mut self, status: impl Into<String>) -> Self {
        self.initial_status = status.into();
        self
    }

    /// Submits a purchase order.
    ///
    /// Every line is checked (part exists, quantity valid, enough stock for
    /// the cumulative demand on that part) before anything is written.
    #[instrument(skip(self, request), fields(client_id = ?request.client_id))]
    pub async fn submit_order(
        &self,
        request: SubmitOrderRequest,
    ) -> Result<SubmittedOrder, ServiceError> {
        let result = self.submit(request).await;

        match &result {
            Ok(order) => {
                counter!("inventory.orders.submitted", 1);
                info!(po_no = order.po_no, "Purchase order created");
            }
            Err(e) => {
                counter!("inventory.orders.rejected", 1, "reason" => e.code());
                if e.is_rejection() {
                    info!(error = %e, "Purchase order rejected");
                } else {
                    warn!(error = %e, "Purchase order failed");
                }
            }
        }

        result
    }

    async fn submit(&self, request: SubmitOrderRequest) -> Result<SubmittedOrder, ServiceError> {
        let (client_id, lines) = check_envelope(&request, self.min_lines)?;
        let status = self.initial_status.clone();

        let po_no = self.db.transaction::<_, i32, ServiceError>(move |txn| {
            Box::pin(async move {
                CatalogRepository::claim_write_lock(txn, client_id).await?;
                CatalogRepository::find_client(txn, client_id)
                    .await?
                    .ok_or(ServiceError::ClientNotFound(client_id))?;

                // Pre-flight: no writes until every line has been checked
                let mut demand = DemandLedger::default();
                let mut planned = Vec::with_capacity(lines.len());
                for (index, line) in lines.iter().enumerate() {
                    let parsed = parse_line(index + 1, line)?;
                    let part = CatalogRepository::find_part(txn, parsed.part_id)
                        .await?
                        .ok_or(ServiceError::PartNotFound(parsed.part_id))?;

                    let requested = demand.add(part.id, parsed.qty);
                    let available = i64::from(part.quantity_on_hand);
                    if available < requested {
                        return Err(ServiceError::InsufficientStock {
                            part_id: part.id,
                            available,
                            requested,
                        });
                    }
                    planned.push(parsed);
                }

                let po_no =
                    OrderRepository::insert_order(txn, client_id, Utc::now(), &status).await?;

                for line in planned {
                    // Price is read again inside the transaction at write time
                    let price = CatalogRepository::find_part(txn, line.part_id)
                        .await?
                        .map(|part| part.price)
                        .ok_or(ServiceError::PartNotFound(line.part_id))?;

                    let line_no = i32::try_from(line.line_no).map_err(|_| {
                        ServiceError::InvalidRequest("too many lines in one order".into())
                    })?;

                    OrderRepository::insert_line_item(
                        txn,
                        NewLineItem {
                            purchase_order_id: po_no,
                            line_no,
                            part_id: line.part_id,
                            quantity: line.qty,
                            price,
                        },
                    )
                    .await?;
                    CatalogRepository::decrement_stock(txn, line.part_id, line.qty).await?;
                }

                Ok(po_no)
            })
        })
        .await?;

        Ok(SubmittedOrder { po_no })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request(client_id: Option<i32>, lines: Option<Vec<OrderLineRequest>>) -> SubmitOrderRequest {
        SubmitOrderRequest { client_id, lines }
    }

    #[test]
    fn missing_lines_is_invalid_request() {
        let err = check_envelope(&request(Some(1), None), 1).unwrap_err();
        assert_matches!(err, ServiceError::InvalidRequest(_));
    }

    #[test]
    fn empty_lines_is_invalid_request_even_with_zero_minimum() {
        let err = check_envelope(&request(Some(1), Some(vec![])), 0).unwrap_err();
        assert_matches!(err, ServiceError::InvalidRequest(_));
    }

    #[test]
    fn fewer_lines_than_minimum_is_invalid_request() {
        let lines = vec![OrderLineRequest::new(1, 1)];
        let err = check_envelope(&request(Some(1), Some(lines)), 2).unwrap_err();
        assert_matches!(err, ServiceError::InvalidRequest(msg) if msg.contains("at least 2"));
    }

    #[test]
    fn missing_client_is_invalid_request() {
        let lines = vec![OrderLineRequest::new(1, 1)];
        let err = check_envelope(&request(None, Some(lines)), 1).unwrap_err();
        assert_matches!(err, ServiceError::InvalidRequest(msg) if msg.contains("clientId"));
    }

    #[test]
    fn envelope_passes_lines_through_in_order() {
        let lines = vec![OrderLineRequest::new(3, 1), OrderLineRequest::new(1, 2)];
        let (client_id, checked) = check_envelope(&request(Some(9), Some(lines)), 1).unwrap();
        assert_eq!(client_id, 9);
        assert_eq!(checked[0].part_no, Some(3));
        assert_eq!(checked[1].part_no, Some(1));
    }

    #[test]
    fn parse_line_accepts_positive_quantities() {
        let parsed = parse_line(2, &OrderLineRequest::new(5, 12)).unwrap();
        assert_eq!(
            parsed,
            ParsedLine {
                line_no: 2,
                part_id: 5,
                qty: 12
            }
        );
    }

    #[test]
    fn parse_line_rejects_out_of_range_quantity() {
        let err = parse_line(1, &OrderLineRequest::new(5, i64::from(i32::MAX) + 1)).unwrap_err();
        assert_matches!(err, ServiceError::InvalidLine { line: 1, .. });
    }

    #[test]
    fn demand_accumulates_per_part() {
        let mut demand = DemandLedger::default();
        assert_eq!(demand.add(1, 10), 10);
        assert_eq!(demand.add(2, 3), 3);
        assert_eq!(demand.add(1, 5), 15);
    }

    #[test]
    fn request_accepts_camel_and_snake_case() {
        let camel: SubmitOrderRequest =
            serde_json::from_str(r#"{"clientId":1,"lines":[{"partNo":2,"qty":3}]}"#).unwrap();
        let snake: SubmitOrderRequest =
            serde_json::from_str(r#"{"client_id":1,"lines":[{"part_no":2,"qty":3}]}"#).unwrap();

        for req in [camel, snake] {
            assert_eq!(req.client_id, Some(1));
            let lines = req.lines.unwrap();
            assert_eq!(lines[0].part_no, Some(2));
            assert_eq!(lines[0].qty, Some(3));
        }
    }
}
