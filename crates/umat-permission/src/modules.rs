//! Module names used by the admin console's role editor

/// Members
pub const UMAT: &str = "umat";
/// Initiation records
pub const QIUDAO: &str = "qiudao";
/// Temples
pub const FOTANG: &str = "fotang";
/// Officiants
pub const DIAN_CHUAN_SHI: &str = "dian_chuan_shi";
/// Institutions
pub const INSTITUTION: &str = "institution";
/// Events
pub const EVENT: &str = "event";
/// User accounts
pub const ACCOUNT: &str = "account";
/// Roles
pub const ROLE: &str = "role";
/// Dashboards
pub const DASHBOARD: &str = "dashboard";
/// Reports
pub const REPORT: &str = "report";

/// Every module, in the order the role editor lists them
pub const ALL: &[&str] = &[
    UMAT,
    QIUDAO,
    FOTANG,
    DIAN_CHUAN_SHI,
    INSTITUTION,
    EVENT,
    ACCOUNT,
    ROLE,
    DASHBOARD,
    REPORT,
];

/// Check whether a module name is one the console knows
#[inline]
#[must_use]
pub fn is_known(module: &str) -> bool {
    ALL.contains(&module)
}
