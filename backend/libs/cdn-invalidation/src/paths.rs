//! Helpers for CDN path patterns and caller references

use chrono::Utc;
use uuid::Uuid;

/// Path patterns purged after a mutation of one tenant resource
///
/// # Example
///
/// ```
/// use cdn_invalidation::tenant_paths;
///
/// let paths = tenant_paths("/api/employee", "tenant-customer2", "42");
/// assert_eq!(paths, vec![
///     "/api/employee/tenant-customer2/42".to_string(),
///     "/api/employee/tenant-customer2*".to_string(),
/// ]);
/// ```
pub fn tenant_paths(prefix: &str, tenant_id: &str, resource_id: &str) -> Vec<String> {
    let prefix = prefix.trim_end_matches('/');
    let tenant = urlencoding::encode(tenant_id);
    let resource = urlencoding::encode(resource_id);

    vec![
        format!("{}/{}/{}", prefix, tenant, resource),
        format!("{}/{}*", prefix, tenant),
    ]
}

/// Unique caller reference: resource id, wall clock in millis, random suffix
pub fn caller_reference(resource_id: &str) -> String {
    format!(
        "update-{}-{}-{}",
        resource_id,
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}
