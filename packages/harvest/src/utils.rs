use soroban_decimal::Decimal;

// Validate all bps values are between 0 and 10_000
#[macro_export]
macro_rules! validate_bps {
    ($($bps:expr),*) => {
        {
            $(
                if !(0..=10_000i64).contains(&$bps) {
                    panic!("value is not within the range of 0 to 10_000 bps")
                }
            )*
        }
    };
}

pub fn assert_approx_ratio(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    let diff = a.abs_diff(b);
    diff <= tolerance
}
