use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub position: String,
    pub tenant_id: String,
}

/// Fields a caller may set; the id and tenant are assigned by the origin
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    #[validate(length(min = 1, max = 100, message = "firstName must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "lastName must be 1-100 characters"))]
    pub last_name: String,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub company_name: String,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub position: String,
}

#[derive(Debug, Clone)]
pub struct User {
    pub email: String,
    pub password: String,
    pub tenant_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub email: String,
    pub tenant_id: String,
    pub message: String,
}

/// Case-insensitive substring filters; unset fields match everything
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub position: Option<String>,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        contains(&employee.first_name, self.first_name.as_deref())
            && contains(&employee.last_name, self.last_name.as_deref())
            && contains(&employee.company_name, self.company_name.as_deref())
            && contains(&employee.position, self.position.as_deref())
    }
}

fn contains(value: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) if !needle.is_empty() => value
            .to_lowercase()
            .contains(&needle.to_lowercase()),
        _ => true,
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PageQuery {
    /// Page numbers start at 1; sizes are clamped to `1..=MAX_PAGE_SIZE`
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1)).saturating_mul(self.page_size)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
}

impl<T> PagedResponse<T> {
    pub fn new(data: Vec<T>, total: usize, query: PageQuery) -> Self {
        Self {
            data,
            total,
            total_pages: total.div_ceil(query.page_size),
            page: query.page,
            page_size: query.page_size,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MutationResponse<T> {
    pub message: String,
    pub data: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(first: &str, position: &str) -> Employee {
        Employee {
            id: 1,
            first_name: first.to_string(),
            last_name: "Smith".to_string(),
            company_name: "TechCorp".to_string(),
            position: position.to_string(),
            tenant_id: "tenant-customer1".to_string(),
        }
    }

    #[test]
    fn test_page_query_normalization() {
        let query = PageQuery { page: 0, page_size: 10_000 }.normalized();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, MAX_PAGE_SIZE);
        assert_eq!(query.offset(), 0);

        let query = PageQuery { page: 3, page_size: 50 }.normalized();
        assert_eq!(query.offset(), 100);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let query = PageQuery { page: 1, page_size: 50 };
        let paged: PagedResponse<u8> = PagedResponse::new(vec![], 151, query);
        assert_eq!(paged.total_pages, 4);

        let paged: PagedResponse<u8> = PagedResponse::new(vec![], 0, query);
        assert_eq!(paged.total_pages, 0);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let filter = EmployeeFilter {
            first_name: Some("jo".to_string()),
            position: Some("ENGINEER".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&employee("John", "Software Engineer")));
        assert!(!filter.matches(&employee("Jane", "Software Engineer")));
        assert!(EmployeeFilter::default().matches(&employee("Jane", "Architect")));
    }

    #[test]
    fn test_input_validation() {
        let input = EmployeeInput {
            first_name: String::new(),
            last_name: "Smith".to_string(),
            company_name: String::new(),
            position: String::new(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_employee_serializes_camel_case() {
        let json = serde_json::to_value(employee("John", "Architect")).unwrap();
        assert_eq!(json["firstName"], "John");
        assert_eq!(json["tenantId"], "tenant-customer1");
    }
}
