use crate::{
    api::respond,
    error::{AppError, AppResult},
    model::employee::{Employee, EmployeeFields, NewEmployee},
    service::{Action, Dispatcher, employee::LIST_LIMIT},
};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct EmployeeQuery {
    /// Substring of id, first name, last name or email
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteQuery {
    /// Must be `true`; deletion is irreversible
    pub confirm: Option<bool>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 2)]
    pub total: usize,
    #[schema(example = 500)]
    pub limit: i64,
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee created", body = Object, example = json!({
            "message": "Employee E1003 created.",
            "level": "success",
            "data": {"employee_id": "E1003", "first_name": "Ana", "last_name": "Lee"}
        })),
        (status = 400, description = "Missing required field", body = Object, example = json!({
            "error": "First name is required",
            "field": "first_name"
        })),
        (status = 409, description = "Employee ID already exists")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn create_employee(
    dispatcher: web::Data<Dispatcher>,
    payload: web::Json<NewEmployee>,
) -> AppResult<HttpResponse> {
    let outcome = dispatcher
        .dispatch(Action::CreateEmployee(payload.into_inner()))
        .await?;
    Ok(respond(outcome))
}

#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Employees, newest first, at most 500", body = EmployeeListResponse)
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn list_employees(
    dispatcher: web::Data<Dispatcher>,
    query: web::Query<EmployeeQuery>,
) -> AppResult<HttpResponse> {
    debug!(search = ?query.search, "Listing employees");
    let data = dispatcher.employees.list(query.search.as_deref()).await?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        total: data.len(),
        data,
        limit: LIST_LIMIT,
    }))
}

/// Employee picker entries, ordered by name
#[utoipa::path(
    get,
    path = "/api/employees/options",
    responses((status = 200, description = "Picker entries", body = Vec<EmployeeOption>)),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn employee_options(dispatcher: web::Data<Dispatcher>) -> AppResult<HttpResponse> {
    let options = dispatcher.employees.options().await?;
    Ok(HttpResponse::Ok().json(options.as_slice()))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(("employee_id", Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Employee not found"
        }))
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn get_employee(
    dispatcher: web::Data<Dispatcher>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    match dispatcher.employees.get(&path.into_inner()).await? {
        Some(employee) => Ok(HttpResponse::Ok().json(employee)),
        None => Err(AppError::NotFound("Employee".to_string())),
    }
}

/// Update Employee (full replace of mutable fields)
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}",
    params(("employee_id", Path, description = "Employee ID")),
    request_body = EmployeeFields,
    responses(
        (status = 200, description = "Employee updated", body = Object),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee E404 not found.",
            "level": "warning",
            "data": null
        }))
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn update_employee(
    dispatcher: web::Data<Dispatcher>,
    path: web::Path<String>,
    body: web::Json<EmployeeFields>,
) -> AppResult<HttpResponse> {
    let outcome = dispatcher
        .dispatch(Action::UpdateEmployee {
            employee_id: path.into_inner(),
            fields: body.into_inner(),
        })
        .await?;
    Ok(respond(outcome))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(("employee_id", Path, description = "Employee ID"), DeleteQuery),
    responses(
        (status = 200, description = "Successfully deleted", body = Object),
        (status = 400, description = "Deletion not confirmed"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Attendance records still reference the employee", body = Object, example = json!({
            "error": "Employee is unknown or still has attendance records",
            "details": "update or delete on table \"employees\" violates foreign key constraint"
        }))
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn delete_employee(
    dispatcher: web::Data<Dispatcher>,
    path: web::Path<String>,
    query: web::Query<DeleteQuery>,
) -> AppResult<HttpResponse> {
    let outcome = dispatcher
        .dispatch(Action::DeleteEmployee {
            employee_id: path.into_inner(),
            confirmed: query.confirm.unwrap_or(false),
        })
        .await?;
    Ok(respond(outcome))
}
