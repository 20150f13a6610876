//! Employees: department, position and contract dates.

use crate::error::RegistryError;
use crate::registry::ModelRegistry;
use crate::resource::{Patch, Record, Resource};
use crate::schema::patch::double_option;
use crate::schema::{
    EnumMember, EnumSpec, FieldSpec, FieldType, ModelSchema, Rule, CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD,
};
use crate::store::{MemoryStore, Store};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub static POSITIONS: EnumSpec = EnumSpec {
    name: "employee-positions",
    members: &[
        EnumMember { name: "ASSOCIATE", value: "Associate" },
        EnumMember { name: "ANALYST", value: "Analyst" },
        EnumMember { name: "SPECIALIST", value: "Specialist" },
        EnumMember { name: "SENIOR_SPECIALIST", value: "Senior Specialist" },
        EnumMember { name: "MANAGER", value: "Manager" },
        EnumMember { name: "SENIOR_MANAGER", value: "Senior Manager" },
        EnumMember { name: "DIRECTOR", value: "Director" },
        EnumMember { name: "VICE_PRESIDENT", value: "Vice President" },
        EnumMember { name: "EXECUTIVE", value: "Executive" },
    ],
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum EmployeePosition {
    Associate,
    Analyst,
    Specialist,
    SeniorSpecialist,
    Manager,
    SeniorManager,
    Director,
    VicePresident,
    Executive,
}

impl EmployeePosition {
    const ALL: [EmployeePosition; 9] = [
        EmployeePosition::Associate,
        EmployeePosition::Analyst,
        EmployeePosition::Specialist,
        EmployeePosition::SeniorSpecialist,
        EmployeePosition::Manager,
        EmployeePosition::SeniorManager,
        EmployeePosition::Director,
        EmployeePosition::VicePresident,
        EmployeePosition::Executive,
    ];

    fn member(self) -> &'static EnumMember {
        // ALL and POSITIONS.members share one order.
        &POSITIONS.members[self as usize]
    }

    pub fn value(self) -> &'static str {
        self.member().value
    }
}

impl FromStr for EmployeePosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let member = POSITIONS
            .resolve(s)
            .ok_or_else(|| format!("'{}' is not a valid employee position", s))?;
        Self::ALL
            .into_iter()
            .find(|p| p.member() == member)
            .ok_or_else(|| format!("'{}' is not a valid employee position", s))
    }
}

impl TryFrom<String> for EmployeePosition {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EmployeePosition> for &'static str {
    fn from(p: EmployeePosition) -> Self {
        p.value()
    }
}

impl fmt::Display for EmployeePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

static SCHEMA: ModelSchema = ModelSchema {
    fields: &[
        ID_FIELD,
        FieldSpec::new("first_name", FieldType::Text).rules(&[Rule::NonEmpty]),
        FieldSpec::new("last_name", FieldType::Text).rules(&[Rule::NonEmpty]),
        FieldSpec::new("email", FieldType::Text).rules(&[Rule::Email]),
        FieldSpec::new("department", FieldType::Text).rules(&[Rule::NonEmpty]),
        FieldSpec::new("position", FieldType::Enum(&POSITIONS)),
        FieldSpec::new("hire_date", FieldType::Date),
        FieldSpec::new("contract_end_date", FieldType::Date).optional().nullable(),
        CREATED_AT_FIELD,
        UPDATED_AT_FIELD,
    ],
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(flatten)]
    pub record: Record,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub position: EmployeePosition,
    pub hire_date: NaiveDate,
    #[serde(default)]
    pub contract_end_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmployeeCreate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub position: EmployeePosition,
    pub hire_date: NaiveDate,
    #[serde(default)]
    pub contract_end_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<EmployeePosition>,
    pub hire_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub contract_end_date: Option<Option<NaiveDate>>,
}

impl Patch for EmployeePatch {
    fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.department.is_none()
            && self.position.is_none()
            && self.hire_date.is_none()
            && self.contract_end_date.is_none()
    }
}

impl Resource for Employee {
    type Create = EmployeeCreate;
    type Patch = EmployeePatch;

    const KIND: &'static str = "Employee";
    const ICON: &'static str = "bi-briefcase-fill";

    fn schema() -> &'static ModelSchema {
        &SCHEMA
    }

    fn build(record: Record, input: EmployeeCreate) -> Self {
        Employee {
            record,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            department: input.department,
            position: input.position,
            hire_date: input.hire_date,
            contract_end_date: input.contract_end_date,
        }
    }

    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    fn apply(&mut self, patch: EmployeePatch) {
        if let Some(v) = patch.first_name {
            self.first_name = v;
        }
        if let Some(v) = patch.last_name {
            self.last_name = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.department {
            self.department = v;
        }
        if let Some(v) = patch.position {
            self.position = v;
        }
        if let Some(v) = patch.hire_date {
            self.hire_date = v;
        }
        if let Some(v) = patch.contract_end_date {
            self.contract_end_date = v;
        }
    }
}

/// Registration hook: `employees` over an in-memory store.
pub fn register_model(registry: &mut ModelRegistry) -> Result<(), RegistryError> {
    register_with_store(registry, MemoryStore::<Employee>::new())
}

pub fn register_with_store<S: Store<Employee>>(
    registry: &mut ModelRegistry,
    store: S,
) -> Result<(), RegistryError> {
    registry.register_resource::<Employee, S>("employees", store, Some("Employees"))
}
