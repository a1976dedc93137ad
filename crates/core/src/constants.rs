/// Default number of rows per page for quotation queries
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Default page for quotation queries (1-based)
pub const DEFAULT_PAGE_NUMBER: i64 = 1;

/// Fiat currency used when fetching quotes from external providers
pub const DEFAULT_FIAT: &str = "USD";

/// Minimum age, in years, to register a user
pub const MINIMUM_USER_AGE: u32 = 18;

/// Header row of the quotes CSV export
pub const CSV_HEADER: [&str; 4] = ["ID", "Name", "Code", "Quote"];

/// Audit log messages for manual quotations
pub const AUDIT_QUOTATION_CREATED: &str = "quotation created";
pub const AUDIT_QUOTATION_UPDATED: &str = "quotation updated";
pub const AUDIT_QUOTATION_DELETED: &str = "quotation deleted";
