use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub uid: Uuid,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<Date>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_vendor: bool,
    pub is_superuser: bool,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub profile_picture: Option<String>,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub location: String,
    pub is_routable: bool,
    pub verification_code: Option<String>,
    pub verification_code_expiry: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Decimal(Some((9, 6)))", nullable)]
    pub latitude: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((9, 6)))", nullable)]
    pub longitude: Option<Decimal>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::account_credentials::Entity")]
    AccountCredentials,
    #[sea_orm(has_one = "super::vendor_profiles::Entity")]
    VendorProfile,
}

impl Related<super::account_credentials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountCredentials.def()
    }
}

impl Related<super::vendor_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VendorProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn short_name(&self) -> &str {
        &self.first_name
    }

    /// Placeholder: every account holds every permission. Not an enforcement point.
    pub fn has_permission(&self, _permission: &str, _target: Option<&str>) -> bool {
        true
    }

    /// Placeholder, see [`Model::has_permission`].
    pub fn has_module_permission(&self, _app_label: &str) -> bool {
        true
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.email, &self.mobile_number) {
            (Some(email), _) => f.write_str(email),
            (None, Some(mobile_number)) => f.write_str(mobile_number),
            (None, None) => write!(f, "account {}", self.uid),
        }
    }
}
