use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn short_name(id: &str) -> &str {
    id.split_once("::").map(|(_, rest)| rest).unwrap_or(id)
}

pub fn module_name(id: &str) -> Option<&str> {
    id.split_once("::").map(|(module, _)| module)
}

pub fn stable_triple(id: &str) -> (f32, f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let unit = |bits: u64| ((bits & 0x1f_ffff) as f64 / 0x1f_ffff as f64) as f32 * 2.0 - 1.0;
    (unit(hash), unit(hash >> 21), unit(hash >> 42))
}
