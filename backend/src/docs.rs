#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::models::{
    batch::{
        ApproveItemPayload, BatchItemView, BatchView, CreateBatch, CreateBatchItem, ItemStatus,
        ManageBatchQuery, OverallStatus, RejectPayload, ReturnItemPayload,
    },
    dashboard::{DashboardQuery, DashboardStats, DepartmentRanking, ResourceUsage, StatusBreakdown},
    department::{CreateDepartment, Department},
    evaluation::{CreateEvaluation, Evaluation},
    property::{CreateProperty, Property, PropertyCategory, PropertyListQuery, UpdateProperty},
    user::{
        CreateUser, LoginRequest, LoginResponse, UpdateRolePayload, UserListQuery, UserResponse,
        UserRole,
    },
    PaginatedResponse,
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        login_doc,
        me_doc,
        list_departments_doc,
        list_properties_doc,
        create_batch_doc,
        my_batches_doc,
        batch_detail_doc,
        withdraw_batch_doc,
        evaluate_batch_doc,
        list_users_doc,
        change_role_doc,
        create_property_doc,
        update_property_doc,
        manage_list_batches_doc,
        approve_item_doc,
        reject_item_doc,
        return_item_doc,
        approve_batch_doc,
        reject_batch_doc,
        dashboard_doc,
        export_doc,
        admin_create_user_doc,
        admin_create_department_doc
    ),
    components(
        schemas(
            // auth & users
            LoginRequest,
            LoginResponse,
            UserResponse,
            UserRole,
            CreateUser,
            UpdateRolePayload,
            // catalog
            Department,
            CreateDepartment,
            Property,
            PropertyCategory,
            CreateProperty,
            UpdateProperty,
            // batches
            CreateBatch,
            CreateBatchItem,
            BatchView,
            BatchItemView,
            ItemStatus,
            OverallStatus,
            ApproveItemPayload,
            RejectPayload,
            ReturnItemPayload,
            CreateEvaluation,
            Evaluation,
            // dashboard
            DashboardStats,
            StatusBreakdown,
            ResourceUsage,
            DepartmentRanking
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "Auth", description = "Login and current user"),
        (name = "Catalog", description = "Departments and shared property"),
        (name = "Batches", description = "Requests submitted by departments"),
        (name = "Manage", description = "Approver endpoints"),
        (name = "Admin", description = "Account and department administration")
    ),
    security(("BearerAuth" = []))
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_string());

        components.add_security_scheme("BearerAuth", SecurityScheme::Http(bearer));
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many attempts")
    ),
    tag = "Auth",
    security(())
)]
fn login_doc() {}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses((status = 200, description = "Current user", body = UserResponse)),
    tag = "Auth"
)]
fn me_doc() {}

#[utoipa::path(
    get,
    path = "/api/departments",
    responses((status = 200, body = [Department])),
    tag = "Catalog"
)]
fn list_departments_doc() {}

#[utoipa::path(
    get,
    path = "/api/properties",
    params(PropertyListQuery),
    responses((status = 200, body = [Property])),
    tag = "Catalog"
)]
fn list_properties_doc() {}

#[utoipa::path(
    post,
    path = "/api/batches",
    request_body = CreateBatch,
    responses(
        (status = 201, description = "Batch submitted", body = BatchView),
        (status = 400, description = "Invalid items or usage window")
    ),
    tag = "Batches"
)]
fn create_batch_doc() {}

#[utoipa::path(
    get,
    path = "/api/batches/me",
    responses((status = 200, description = "Batches of the caller's department", body = [BatchView])),
    tag = "Batches"
)]
fn my_batches_doc() {}

#[utoipa::path(
    get,
    path = "/api/batches/{id}",
    params(("id" = String, Path, description = "Batch ID")),
    responses((status = 200, body = BatchView), (status = 404)),
    tag = "Batches"
)]
fn batch_detail_doc() {}

#[utoipa::path(
    delete,
    path = "/api/batches/{id}",
    params(("id" = String, Path, description = "Batch ID")),
    responses(
        (status = 204, description = "Withdrawn"),
        (status = 409, description = "Items already decided")
    ),
    tag = "Batches"
)]
fn withdraw_batch_doc() {}

#[utoipa::path(
    post,
    path = "/api/batches/{id}/evaluation",
    params(("id" = String, Path, description = "Batch ID")),
    request_body = CreateEvaluation,
    responses(
        (status = 201, body = BatchView),
        (status = 409, description = "Not evaluable yet or already evaluated")
    ),
    tag = "Batches"
)]
fn evaluate_batch_doc() {}

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserListQuery),
    responses((status = 200, body = [UserResponse])),
    tag = "Manage"
)]
fn list_users_doc() {}

#[utoipa::path(
    put,
    path = "/api/users/{id}/role",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateRolePayload,
    responses(
        (status = 200, body = UserResponse),
        (status = 403, description = "Role change not permitted by the hierarchy")
    ),
    tag = "Manage"
)]
fn change_role_doc() {}

#[utoipa::path(
    post,
    path = "/api/manage/properties",
    request_body = CreateProperty,
    responses((status = 201, body = Property), (status = 403)),
    tag = "Manage"
)]
fn create_property_doc() {}

#[utoipa::path(
    put,
    path = "/api/manage/properties/{id}",
    params(("id" = String, Path, description = "Property ID")),
    request_body = UpdateProperty,
    responses(
        (status = 200, body = Property),
        (status = 409, description = "Total below units in use")
    ),
    tag = "Manage"
)]
fn update_property_doc() {}

#[utoipa::path(
    get,
    path = "/api/manage/batches",
    params(ManageBatchQuery),
    responses((status = 200, body = PaginatedResponse<BatchView>)),
    tag = "Manage"
)]
fn manage_list_batches_doc() {}

#[utoipa::path(
    post,
    path = "/api/manage/batches/{id}/items/{item_id}/approve",
    params(
        ("id" = String, Path, description = "Batch ID"),
        ("item_id" = String, Path, description = "Line item ID")
    ),
    request_body = ApproveItemPayload,
    responses(
        (status = 200, body = BatchView),
        (status = 400, description = "Quantity out of range"),
        (status = 409, description = "Already decided or insufficient stock")
    ),
    tag = "Manage"
)]
fn approve_item_doc() {}

#[utoipa::path(
    post,
    path = "/api/manage/batches/{id}/items/{item_id}/reject",
    params(
        ("id" = String, Path, description = "Batch ID"),
        ("item_id" = String, Path, description = "Line item ID")
    ),
    request_body = RejectPayload,
    responses((status = 200, body = BatchView), (status = 409)),
    tag = "Manage"
)]
fn reject_item_doc() {}

#[utoipa::path(
    post,
    path = "/api/manage/batches/{id}/items/{item_id}/return",
    params(
        ("id" = String, Path, description = "Batch ID"),
        ("item_id" = String, Path, description = "Line item ID")
    ),
    request_body = ReturnItemPayload,
    responses((status = 200, body = BatchView), (status = 409)),
    tag = "Manage"
)]
fn return_item_doc() {}

#[utoipa::path(
    post,
    path = "/api/manage/batches/{id}/approve",
    params(("id" = String, Path, description = "Batch ID")),
    responses(
        (status = 200, body = BatchView),
        (status = 409, description = "Nothing pending or insufficient stock")
    ),
    tag = "Manage"
)]
fn approve_batch_doc() {}

#[utoipa::path(
    post,
    path = "/api/manage/batches/{id}/reject",
    params(("id" = String, Path, description = "Batch ID")),
    request_body = RejectPayload,
    responses((status = 200, body = BatchView), (status = 409)),
    tag = "Manage"
)]
fn reject_batch_doc() {}

#[utoipa::path(
    get,
    path = "/api/manage/dashboard",
    params(DashboardQuery),
    responses((status = 200, body = DashboardStats)),
    tag = "Manage"
)]
fn dashboard_doc() {}

#[utoipa::path(
    get,
    path = "/api/manage/export",
    params(DashboardQuery),
    responses((status = 200, description = "CSV, one row per line item", content_type = "text/csv", body = String)),
    tag = "Manage"
)]
fn export_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = CreateUser,
    responses((status = 201, body = UserResponse), (status = 409)),
    tag = "Admin"
)]
fn admin_create_user_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/departments",
    request_body = CreateDepartment,
    responses((status = 201, body = Department), (status = 409)),
    tag = "Admin"
)]
fn admin_create_department_doc() {}
