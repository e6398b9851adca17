pub(crate) mod debounce;

pub(crate) use debounce::{Debounce, DebounceTimer};

const PADDING_LEFT_CLASSES: [&str; 15] = [
    "pl-8", "pl-12", "pl-16", "pl-20", "pl-24", "pl-28", "pl-32", "pl-36", "pl-40", "pl-44",
    "pl-48", "pl-52", "pl-56", "pl-60", "pl-64",
];

/// Left padding for a tree row at `level`. Levels past the last class reuse it.
pub(crate) fn padding_left_class(level: u32) -> &'static str {
    let i = (level as usize).min(PADDING_LEFT_CLASSES.len() - 1);
    PADDING_LEFT_CLASSES[i]
}

pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}
