/// What a completed probe returns. 4xx and 5xx answers are still a `ProbeResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status_code: u16,
    pub body: String,
}
