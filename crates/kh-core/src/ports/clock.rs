/// Wall-clock source for link timestamps and request signing.
pub trait ClockPort: Send + Sync {
    fn now_ms(&self) -> i64;
}
