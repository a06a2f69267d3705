// ── Typed request bodies for create/update ──
//
// Create requests mirror what a form collects, so required references
// are `Option` until validated. Update requests are partial: every field
// is optional and omitted from the JSON body when absent.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::model::{CategoryStatus, EntityId};
use crate::validate::{FieldErrors, Validate, Validator};

// ── Client ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Validate for CreateClientRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required("companyName", &self.company_name)
            .email("email", self.email.as_deref())
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Validate for UpdateClientRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required_if_present("companyName", self.company_name.as_deref())
            .email("email", self.email.as_deref())
            .finish()
    }
}

// ── Employee ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Validate for CreateEmployeeRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required("firstName", &self.first_name)
            .required("lastName", &self.last_name)
            .required_email("email", &self.email)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Validate for UpdateEmployeeRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        v.required_if_present("firstName", self.first_name.as_deref())
            .required_if_present("lastName", self.last_name.as_deref());
        if let Some(email) = self.email.as_deref() {
            v.required_email("email", email);
        }
        v.finish()
    }
}

// ── Product ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
}

impl Validate for CreateProductRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new().required("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
}

impl Validate for UpdateProductRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required_if_present("name", self.name.as_deref())
            .finish()
    }
}

// ── Product category ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CategoryStatus>,
}

impl Validate for CreateCategoryRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new().required("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CategoryStatus>,
}

impl Validate for UpdateCategoryRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required_if_present("name", self.name.as_deref())
            .finish()
    }
}

// ── Sale ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemRequest {
    pub product_id: EntityId,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

fn validate_items(v: &mut Validator, items: &[SaleItemRequest]) {
    for (i, item) in items.iter().enumerate() {
        v.positive(&format!("items[{i}].quantity"), item.quantity);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub sale_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<EntityId>,
    pub items: Vec<SaleItemRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Validate for CreateSaleRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        v.required("saleNumber", &self.sale_number)
            .required_ref("clientId", self.client_id.as_ref())
            .required_ref("items", self.items.first());
        validate_items(&mut v, &self.items);
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSaleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<SaleItemRequest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Validate for UpdateSaleRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        v.required_if_present("saleNumber", self.sale_number.as_deref());
        if let Some(items) = &self.items {
            v.required_ref("items", items.first());
            validate_items(&mut v, items);
        }
        v.finish()
    }
}

// ── Job card ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobCardRequest {
    pub job_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_staff_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<String>,
}

impl Validate for CreateJobCardRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required("jobNumber", &self.job_number)
            .required_ref("clientId", self.client_id.as_ref())
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobCardRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_staff_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<String>,
}

impl Validate for UpdateJobCardRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required_if_present("jobNumber", self.job_number.as_deref())
            .finish()
    }
}

// ── Client integration ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntegrationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<EntityId>,
    pub label: String,
    pub value: String,
}

impl Validate for CreateIntegrationRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required_ref("clientId", self.client_id.as_ref())
            .required("label", &self.label)
            .required("value", &self.value)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIntegrationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Validate for UpdateIntegrationRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required_if_present("label", self.label.as_deref())
            .required_if_present("value", self.value.as_deref())
            .finish()
    }
}

// ── Account ────────────────────────────────────────────────────────

/// Login form input. Never serialized; the API layer builds the body.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required_email("email", &self.email)
            .required("password", self.password.expose_secret())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ChangePasswordRequest {
    pub current_password: SecretString,
    pub new_password: SecretString,
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required("currentPassword", self.current_password.expose_secret())
            .required("newPassword", self.new_password.expose_secret())
            .finish()
    }
}
