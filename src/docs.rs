use crate::api::attendance::CreateAttendance;
use crate::api::leaves::CreateLeave;
use crate::api::meetings::{CreateMeeting, ParticipantRequest};
use crate::api::notifications::CreateNotification;
use crate::api::roles::CreateRole;
use crate::api::work::{CreateBreak, CreateSchedule};
use crate::api::workitems::{CreateProject, CreateTask};
use crate::auth::handlers::{LoginRequest, RegisterRequest, TokenResponse};
use crate::model::attendance::Attendance;
use crate::model::leave_request::LeaveRequest;
use crate::model::meeting::{Meeting, MeetingParticipant};
use crate::model::notification::Notification;
use crate::model::role::Role;
use crate::model::user::PublicUser;
use crate::model::work::{Break, Schedule};
use crate::model::workitem::{Project, Task};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Management System API",
        version = "1.0.0",
        description = r#"
## Employee Management System

This API covers the day-to-day operations of a small organization.

### 🔹 Key Features
- **Authentication & RBAC**
  - Register, login, refresh tokens, role-gated endpoints
- **Attendance & Work**
  - Check-in/check-out, breaks, weekly schedules
- **Meetings**
  - Organize meetings and manage participants
- **Projects & Tasks**
  - Shared project/task tracking with status and priority
- **Leave Management**
  - Request, approve/reject, and cancel leaves
- **Notifications**
  - Role-gated delivery with read tracking

### 🔐 Security
Protected endpoints use **JWT Bearer authentication**. Approval and
analytics endpoints require the **manager** or **super_admin** role.

### 📦 Response Format
JSON-based RESTful responses; list endpoints return bare arrays.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::refresh,
        crate::auth::handlers::me,

        crate::api::roles::list_roles,
        crate::api::roles::create_role,
        crate::api::roles::get_role,
        crate::api::roles::update_role,
        crate::api::roles::delete_role,

        crate::api::attendance::list_attendance,
        crate::api::attendance::create_attendance,
        crate::api::attendance::checkout,

        crate::api::work::list_breaks,
        crate::api::work::create_break,
        crate::api::work::update_break,
        crate::api::work::delete_break,
        crate::api::work::list_schedules,
        crate::api::work::create_schedule,
        crate::api::work::update_schedule,
        crate::api::work::delete_schedule,

        crate::api::meetings::list_meetings,
        crate::api::meetings::create_meeting,
        crate::api::meetings::get_meeting,
        crate::api::meetings::update_meeting,
        crate::api::meetings::delete_meeting,
        crate::api::meetings::list_participants,
        crate::api::meetings::add_participant,
        crate::api::meetings::remove_participant,

        crate::api::workitems::list_projects,
        crate::api::workitems::create_project,
        crate::api::workitems::get_project,
        crate::api::workitems::update_project,
        crate::api::workitems::delete_project,
        crate::api::workitems::list_tasks,
        crate::api::workitems::create_task,
        crate::api::workitems::get_task,
        crate::api::workitems::update_task,
        crate::api::workitems::delete_task,

        crate::api::leaves::list_leaves,
        crate::api::leaves::create_leave,
        crate::api::leaves::get_leave,
        crate::api::leaves::update_leave,
        crate::api::leaves::cancel_leave,
        crate::api::leaves::approve_leave,
        crate::api::leaves::reject_leave,

        crate::api::notifications::list_notifications,
        crate::api::notifications::create_notification,
        crate::api::notifications::mark_read,

        crate::api::analytics::attendance_summary,
        crate::api::analytics::task_status,
        crate::api::analytics::pending_leaves,
        crate::api::analytics::unread_notifications,

        crate::api::health::health
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            PublicUser,
            Role,
            CreateRole,
            Attendance,
            CreateAttendance,
            Break,
            CreateBreak,
            Schedule,
            CreateSchedule,
            Meeting,
            CreateMeeting,
            MeetingParticipant,
            ParticipantRequest,
            Project,
            CreateProject,
            Task,
            CreateTask,
            LeaveRequest,
            CreateLeave,
            Notification,
            CreateNotification
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login, and token APIs"),
        (name = "Roles", description = "Role registry APIs"),
        (name = "Attendance", description = "Attendance tracking APIs"),
        (name = "Work", description = "Break and schedule APIs"),
        (name = "Meetings", description = "Meeting and participant APIs"),
        (name = "Work Items", description = "Project and task APIs"),
        (name = "Leaves", description = "Leave request and approval APIs"),
        (name = "Notifications", description = "Notification delivery APIs"),
        (name = "Analytics", description = "Organization-wide counters"),
        (name = "Health", description = "Liveness probe"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

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
