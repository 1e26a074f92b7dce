use crate::api::attendance::StatusReq;
use crate::api::employee::EmployeeListResponse;
use crate::auth::session::{AuthMethod, Session};
use crate::model::attendance::{AttendanceEntry, AttendanceRecord, DayPhase};
use crate::model::employee::{Employee, EmployeeFields, EmployeeOption, EmployeeStatus, NewEmployee};
use crate::models::{LoginReqDto, LoginResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Desk API",
        version = "1.0.0",
        description = r#"
## Attendance Desk

Front-desk attendance tracking for a small organisation, backed by PostgreSQL.

### Features
- **Attendance**
  - Daily check-in and check-out, one record per employee per day
  - Free-text status/notes, today's view and a recent history
- **Employees**
  - Create, update, list, search and delete employee records

### Security
Sign in with the shared password (`POST /auth/login`) or a pre-shared token
(`GET /auth/login?token=...`). Every `/api` endpoint requires the resulting
session, sent as a **Bearer** token or the session cookie.

### Responses
State-changing endpoints answer `{message, level, data}`; `level` is
`warning` when nothing changed (for example checking out with no open check-in).
"#,
    ),
    paths(
        crate::api::health::health,

        crate::auth::handlers::login_password,
        crate::auth::handlers::login_token,
        crate::auth::handlers::logout,
        crate::auth::handlers::current_session,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::set_status,
        crate::api::attendance::delete_today,
        crate::api::attendance::today_record,
        crate::api::attendance::list_today,
        crate::api::attendance::list_recent,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::employee_options,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            AuthMethod,
            Session,
            AttendanceRecord,
            AttendanceEntry,
            DayPhase,
            StatusReq,
            Employee,
            EmployeeStatus,
            EmployeeOption,
            EmployeeFields,
            NewEmployee,
            EmployeeListResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Auth", description = "Sign-in and sessions"),
        (name = "Attendance", description = "Daily attendance APIs"),
        (name = "Employee", description = "Employee roster APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
