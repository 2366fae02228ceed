//! Tenant-scoped employee storage
//!
//! Every operation takes the tenant id; records of other tenants are
//! invisible to it.

use crate::models::{Employee, EmployeeFilter, EmployeeInput, PageQuery};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tokio::sync::RwLock;

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// One page of matching employees plus the total match count
    async fn list(
        &self,
        tenant_id: &str,
        filter: &EmployeeFilter,
        page: PageQuery,
    ) -> (Vec<Employee>, usize);

    async fn add(&self, tenant_id: &str, input: EmployeeInput) -> Employee;

    /// `None` when `id` does not exist within `tenant_id`
    async fn update(&self, tenant_id: &str, id: u64, input: EmployeeInput) -> Option<Employee>;
}

#[derive(Default)]
pub struct InMemoryEmployeeRepository {
    employees: RwLock<Vec<Employee>>,
}

const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Michael", "Sarah", "David", "Emily", "Robert", "Lisa", "James", "Mary",
    "Santosh",
];
const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez",
];
const COMPANIES: &[&str] = &[
    "TechCorp", "InnovateLabs", "DataSystems", "CloudWorks", "SoftSolutions", "DigitalHub",
    "CodeFactory", "NetServices", "InfoTech", "WebDynamics",
];
const POSITIONS: &[&str] = &[
    "Software Engineer", "Senior Developer", "Project Manager", "Team Lead", "Architect",
    "QA Engineer", "DevOps Engineer", "Product Manager", "Scrum Master", "Business Analyst",
];

pub const SEEDED_PER_TENANT: usize = 150;

impl InMemoryEmployeeRepository {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            employees: RwLock::new(employees),
        }
    }

    /// 150 generated employees each for `tenant-customer1` and `tenant-customer2`
    pub fn seeded() -> Self {
        let mut employees = Vec::with_capacity(SEEDED_PER_TENANT * 2);
        for tenant_id in ["tenant-customer1", "tenant-customer2"] {
            // Same seed per tenant so both datasets share a shape
            let mut rng = StdRng::seed_from_u64(42);
            for _ in 0..SEEDED_PER_TENANT {
                employees.push(Employee {
                    id: employees.len() as u64 + 1,
                    first_name: pick(&mut rng, FIRST_NAMES),
                    last_name: pick(&mut rng, LAST_NAMES),
                    company_name: pick(&mut rng, COMPANIES),
                    position: pick(&mut rng, POSITIONS),
                    tenant_id: tenant_id.to_string(),
                });
            }
        }
        Self::new(employees)
    }
}

fn pick(rng: &mut StdRng, values: &[&str]) -> String {
    values.choose(rng).copied().unwrap_or_default().to_string()
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn list(
        &self,
        tenant_id: &str,
        filter: &EmployeeFilter,
        page: PageQuery,
    ) -> (Vec<Employee>, usize) {
        let employees = self.employees.read().await;
        let matching: Vec<&Employee> = employees
            .iter()
            .filter(|e| e.tenant_id == tenant_id && filter.matches(e))
            .collect();

        let total = matching.len();
        let data = matching
            .into_iter()
            .skip(page.offset())
            .take(page.page_size)
            .cloned()
            .collect();
        (data, total)
    }

    async fn add(&self, tenant_id: &str, input: EmployeeInput) -> Employee {
        let mut employees = self.employees.write().await;
        let id = employees.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let employee = Employee {
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            company_name: input.company_name,
            position: input.position,
            tenant_id: tenant_id.to_string(),
        };
        employees.push(employee.clone());
        employee
    }

    async fn update(&self, tenant_id: &str, id: u64, input: EmployeeInput) -> Option<Employee> {
        let mut employees = self.employees.write().await;
        let employee = employees
            .iter_mut()
            .find(|e| e.id == id && e.tenant_id == tenant_id)?;

        employee.first_name = input.first_name;
        employee.last_name = input.last_name;
        employee.company_name = input.company_name;
        employee.position = input.position;
        Some(employee.clone())
    }
}
