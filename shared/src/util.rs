/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a human-friendly order id: `ORD-NNNN-XX`
///
/// 4 random digits and 2 random uppercase letters (~6.7M combinations).
/// Uniqueness is the caller's job; the order store retries on collision.
pub fn generate_order_id<R: rand::Rng>(rng: &mut R) -> String {
    let digits: u16 = rng.gen_range(0..10_000);
    let a = char::from(b'A' + rng.gen_range(0..26u8));
    let b = char::from(b'A' + rng.gen_range(0..26u8));
    format!("ORD-{digits:04}-{a}{b}")
}
