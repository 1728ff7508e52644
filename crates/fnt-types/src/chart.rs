define_numeric_enum! {
    /// Chart format a map resource is authored in.
    pub enum MapType {
        /// Native Fannithm chart.
        Fannithm = 0,
        /// Bestdori community chart format.
        Bestdori = 1,
    }
}

define_numeric_enum! {
    /// Colour tag shown next to a difficulty.
    pub enum DiffColor {
        Easy = 0,
        Normal = 1,
        Hard = 2,
        Expert = 3,
        Special = 4,
    }
}
