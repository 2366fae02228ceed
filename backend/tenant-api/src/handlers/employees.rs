use crate::error::{AppError, Result};
use crate::models::{EmployeeFilter, EmployeeInput, MutationResponse, PageQuery, PagedResponse};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use edge_auth::AuthenticatedTenant;
use validator::Validate;

/// GET /api/employee
pub async fn list_employees(
    state: web::Data<AppState>,
    tenant: AuthenticatedTenant,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    page(&state, &tenant, &EmployeeFilter::default(), query.into_inner()).await
}

/// GET /api/employee/search
pub async fn search_employees(
    state: web::Data<AppState>,
    tenant: AuthenticatedTenant,
    filter: web::Query<EmployeeFilter>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    page(&state, &tenant, &filter, query.into_inner()).await
}

async fn page(
    state: &AppState,
    tenant: &AuthenticatedTenant,
    filter: &EmployeeFilter,
    query: PageQuery,
) -> Result<HttpResponse> {
    let query = query.normalized();
    let (data, total) = state
        .employees
        .list(tenant.tenant_id(), filter, query)
        .await;

    Ok(HttpResponse::Ok().json(PagedResponse::new(data, total, query)))
}

/// POST /api/employee
pub async fn add_employee(
    state: web::Data<AppState>,
    tenant: AuthenticatedTenant,
    req: web::Json<EmployeeInput>,
) -> Result<HttpResponse> {
    let input = req.into_inner();
    input.validate()?;

    let employee = state.employees.add(tenant.tenant_id(), input).await;
    tracing::info!(tenant_id = %tenant, employee_id = employee.id, "Employee added");

    // Listing pages for this tenant are now stale
    state
        .invalidator
        .notify(&employee.id.to_string(), tenant.tenant_id());

    Ok(HttpResponse::Ok().json(MutationResponse {
        message: "Success".to_string(),
        data: employee,
    }))
}

/// PUT /api/employee/{id}
pub async fn update_employee(
    state: web::Data<AppState>,
    tenant: AuthenticatedTenant,
    path: web::Path<u64>,
    req: web::Json<EmployeeInput>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let input = req.into_inner();
    input.validate()?;

    let employee = state
        .employees
        .update(tenant.tenant_id(), id, input)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Employee {id}")))?;

    tracing::info!(tenant_id = %tenant, employee_id = id, "Employee updated");

    // Invalidation runs detached; the response never waits on the CDN
    state.invalidator.notify(&id.to_string(), tenant.tenant_id());

    Ok(HttpResponse::Ok().json(MutationResponse {
        message: "Success".to_string(),
        data: employee,
    }))
}
