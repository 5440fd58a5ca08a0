/// One raw review record as the reviews API reports it. The API returns
/// reviews in submission order, which is the ordering contract aggregation
/// relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReview {
    pub reviewer_id: u64,
    pub state: String,
}
