//! Data file naming: `accident_<year>.csv.bz2`.

/// Values accepted as a year. Fractional years are truncated toward zero;
/// values outside the `i32` range saturate instead of wrapping.
pub trait IntoYear {
    fn into_year(self) -> i32;
}

impl IntoYear for i32 {
    fn into_year(self) -> i32 {
        self
    }
}

impl IntoYear for i64 {
    fn into_year(self) -> i32 {
        self.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

impl IntoYear for u16 {
    fn into_year(self) -> i32 {
        i32::from(self)
    }
}

impl IntoYear for u32 {
    fn into_year(self) -> i32 {
        i32::try_from(self).unwrap_or(i32::MAX)
    }
}

// float-to-int `as` saturates and maps NaN to 0
impl IntoYear for f64 {
    fn into_year(self) -> i32 {
        self.trunc() as i32
    }
}

impl IntoYear for f32 {
    fn into_year(self) -> i32 {
        self.trunc() as i32
    }
}

/// Build the expected data file name for a year.
pub fn build_filename<Y: IntoYear>(year: Y) -> String {
    format!("accident_{}.csv.bz2", year.into_year())
}
