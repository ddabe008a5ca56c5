// Purchase-order submission
pub mod order_submission;

pub use order_submission::{
    OrderLineRequest, OrderSubmissionService, SubmitOrderRequest, SubmittedOrder,
};
