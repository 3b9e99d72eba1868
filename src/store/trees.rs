pub const BIOMECHANICS_RECORDS: &str = "biomechanics_records";
pub const DRILLS: &str = "drills";
pub const DRILLS_BY_CATEGORY: &str = "drills_by_category";
pub const CONFIG_VERSIONS: &str = "config_versions";
