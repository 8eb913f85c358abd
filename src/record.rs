//! Employee record: the nine-field unit handed to the salary model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::PayscopeError;
use crate::table::Table;

pub const EMPLOYEE_ID: &str = "Employee_ID";
pub const NAME: &str = "Name";
pub const AGE: &str = "Age";
pub const GENDER: &str = "Gender";
pub const DEPARTMENT: &str = "Department";
pub const JOB_TITLE: &str = "Job_Title";
pub const EXPERIENCE_YEARS: &str = "Experience_Years";
pub const EDUCATION_LEVEL: &str = "Education_Level";
pub const LOCATION: &str = "Location";

/// Column order of the one-row table built for a single prediction.
pub const COLUMNS: [&str; 9] = [
    AGE,
    GENDER,
    DEPARTMENT,
    JOB_TITLE,
    EXPERIENCE_YEARS,
    EDUCATION_LEVEL,
    LOCATION,
    NAME,
    EMPLOYEE_ID,
];

pub const AGE_RANGE: (u32, u32) = (18, 70);
pub const EXPERIENCE_RANGE: (u32, u32) = (0, 50);
pub const EMPLOYEE_ID_MAX: usize = 20;
pub const NAME_MAX: usize = 50;
pub const JOB_TITLE_MAX: usize = 100;

pub const DEFAULT_AGE: u32 = 30;
pub const DEFAULT_EXPERIENCE: u32 = 5;
pub const DEFAULT_JOB_TITLE: &str = "Software Engineer";

/// Declares a fixed-choice field: the variants, their wire labels, parsing
/// and serde support through the label.
macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident, $field:expr, { $($variant:ident => $label:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = PayscopeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| {
                        PayscopeError::Input(format!(
                            "{} must be one of {}, got `{}`",
                            $field,
                            $name::ALL
                                .iter()
                                .map(|v| v.as_str())
                                .collect::<Vec<_>>()
                                .join(", "),
                            s
                        ))
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = PayscopeError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum!(Gender, GENDER, {
    Male => "Male",
    Female => "Female",
});

choice_enum!(Department, DEPARTMENT, {
    Sales => "Sales",
    Engineering => "Engineering",
    Marketing => "Marketing",
    Finance => "Finance",
    Hr => "HR",
    Operations => "Operations",
    It => "IT",
    Admin => "Admin",
});

choice_enum!(EducationLevel, EDUCATION_LEVEL, {
    Bachelor => "Bachelor",
    Master => "Master",
    Phd => "PhD",
});

choice_enum!(Location, LOCATION, {
    NewYork => "New York",
    SanFrancisco => "San Francisco",
    Chicago => "Chicago",
    Austin => "Austin",
    Seattle => "Seattle",
    Boston => "Boston",
    Atlanta => "Atlanta",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(rename = "Employee_ID", default)]
    pub employee_id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Department")]
    pub department: Department,
    #[serde(rename = "Job_Title", default = "default_job_title")]
    pub job_title: String,
    #[serde(rename = "Experience_Years")]
    pub experience_years: u32,
    #[serde(rename = "Education_Level")]
    pub education_level: EducationLevel,
    #[serde(rename = "Location")]
    pub location: Location,
}

fn default_job_title() -> String {
    DEFAULT_JOB_TITLE.to_string()
}

impl EmployeeRecord {
    /// Check the range and length constraints the form widgets enforce.
    pub fn validate(&self) -> Result<(), PayscopeError> {
        check_range(AGE, self.age, AGE_RANGE)?;
        check_range(EXPERIENCE_YEARS, self.experience_years, EXPERIENCE_RANGE)?;
        check_len(EMPLOYEE_ID, &self.employee_id, EMPLOYEE_ID_MAX)?;
        check_len(NAME, &self.name, NAME_MAX)?;
        check_len(JOB_TITLE, &self.job_title, JOB_TITLE_MAX)?;
        Ok(())
    }

    /// One-row table in the column order the model was trained against.
    pub fn to_table(&self) -> Table {
        let row = vec![
            self.age.to_string(),
            self.gender.to_string(),
            self.department.to_string(),
            self.job_title.clone(),
            self.experience_years.to_string(),
            self.education_level.to_string(),
            self.location.to_string(),
            self.name.clone(),
            self.employee_id.clone(),
        ];
        Table::new(COLUMNS.iter().map(|c| c.to_string()).collect(), vec![row])
    }

    pub fn display_name(&self) -> &str {
        or_na(&self.name)
    }

    pub fn display_id(&self) -> &str {
        or_na(&self.employee_id)
    }
}

fn or_na(s: &str) -> &str {
    if s.trim().is_empty() {
        "N/A"
    } else {
        s
    }
}

fn check_range(field: &str, value: u32, (min, max): (u32, u32)) -> Result<(), PayscopeError> {
    if value < min || value > max {
        return Err(PayscopeError::Input(format!(
            "{field} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), PayscopeError> {
    let len = value.chars().count();
    if len > max {
        return Err(PayscopeError::Input(format!(
            "{field} must be at most {max} characters, got {len}"
        )));
    }
    Ok(())
}

/// Raw form submission. Every field arrives as text so that a bad value is
/// reported on the page instead of rejected by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeForm {
    pub employee_id: String,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub department: String,
    pub job_title: String,
    pub experience_years: String,
    pub education_level: String,
    pub location: String,
}

impl Default for EmployeeForm {
    fn default() -> Self {
        Self {
            employee_id: String::new(),
            name: String::new(),
            age: DEFAULT_AGE.to_string(),
            gender: Gender::Male.to_string(),
            department: Department::Sales.to_string(),
            job_title: DEFAULT_JOB_TITLE.to_string(),
            experience_years: DEFAULT_EXPERIENCE.to_string(),
            education_level: EducationLevel::Bachelor.to_string(),
            location: Location::NewYork.to_string(),
        }
    }
}

impl TryFrom<&EmployeeForm> for EmployeeRecord {
    type Error = PayscopeError;

    fn try_from(form: &EmployeeForm) -> Result<Self, Self::Error> {
        let record = EmployeeRecord {
            employee_id: form.employee_id.trim().to_string(),
            name: form.name.trim().to_string(),
            age: parse_whole(AGE, &form.age)?,
            gender: form.gender.trim().parse()?,
            department: form.department.trim().parse()?,
            job_title: form.job_title.trim().to_string(),
            experience_years: parse_whole(EXPERIENCE_YEARS, &form.experience_years)?,
            education_level: form.education_level.trim().parse()?,
            location: form.location.trim().parse()?,
        };
        record.validate()?;
        Ok(record)
    }
}

fn parse_whole(field: &str, raw: &str) -> Result<u32, PayscopeError> {
    raw.trim().parse::<u32>().map_err(|_| {
        PayscopeError::Input(format!("{field} must be a whole number, got `{raw}`"))
    })
}
