use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

const WIDTH_CLASSES: [&str; 5] = ["w-8/12", "w-9/12", "w-10/12", "w-11/12", "w-full"];

/// Width class for a shimmer row; consecutive calls spread over the set.
pub fn use_random_width_class() -> &'static str {
    let i = (generate_hash() % WIDTH_CLASSES.len() as u64) as usize;
    WIDTH_CLASSES[i]
}

/* ========================================================== */
/*                     ✨ FUNCTIONS ✨                        */
/* ========================================================== */

static COUNTER: AtomicUsize = AtomicUsize::new(1);

fn generate_hash() -> u64 {
    let mut hasher = DefaultHasher::new();
    let counter = COUNTER.fetch_add(1, Ordering::SeqCst);
    counter.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_width_class_is_known() {
        for _ in 0..20 {
            assert!(WIDTH_CLASSES.contains(&use_random_width_class()));
        }
    }
}
