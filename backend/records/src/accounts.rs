use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    new_id,
    patterns::{EMAIL_PATTERN, PHONE_PATTERN, tidy, tidy_optional},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Adventurer,
    Company,
}

impl Role {
    pub fn min_password_len(self) -> usize {
        match self {
            Role::Adventurer => 6,
            Role::Company => 8,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Adventurer => f.write_str("adventurer"),
            Role::Company => f.write_str("company"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Common surface of the two account kinds.
pub trait Profile {
    const ROLE: Role;

    fn id(&self) -> &str;

    fn email(&self) -> &str;
}

/// Stored form of an account: the public profile plus credentials.
///
/// Only `profile` ever leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account<P> {
    #[serde(flatten)]
    pub profile: P,
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_code: Option<String>,
}

impl<P: Profile> Account<P> {
    pub fn new(profile: P, password_hash: String) -> Self {
        Self {
            profile,
            password_hash,
            reset_code: None,
        }
    }

    pub fn id(&self) -> &str {
        self.profile.id()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Adventurer {
    #[serde(rename = "_id")]
    pub id: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub gender: Gender,
    #[validate(range(min = 16, message = "Minimum age is 16"))]
    pub age: u32,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(regex(path = *EMAIL_PATTERN, message = "Please provide a valid email"))]
    pub email: String,
    #[validate(regex(path = *PHONE_PATTERN, message = "Please provide a valid Jordanian phone number"))]
    pub phone_number: String,
    pub role: Role,
}

impl Profile for Adventurer {
    const ROLE: Role = Role::Adventurer;

    fn id(&self) -> &str {
        &self.id
    }

    fn email(&self) -> &str {
        &self.email
    }
}

impl Adventurer {
    pub fn apply(&mut self, patch: AdventurerPatch) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name.trim().to_string();
        }
        if let Some(gender) = patch.gender {
            self.gender = gender;
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(city) = patch.city {
            self.city = city.trim().to_string();
        }
        if let Some(phone_number) = patch.phone_number {
            self.phone_number = phone_number.trim().to_string();
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdventurerSignup {
    #[serde(default)]
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub gender: Gender,
    #[validate(range(min = 16, message = "Minimum age is 16"))]
    pub age: u32,
    #[serde(default)]
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[serde(default)]
    #[validate(regex(path = *EMAIL_PATTERN, message = "Please provide a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(regex(path = *PHONE_PATTERN, message = "Please provide a valid Jordanian phone number"))]
    pub phone_number: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

impl AdventurerSignup {
    pub fn normalize(&mut self) {
        tidy(&mut self.first_name);
        tidy(&mut self.last_name);
        tidy(&mut self.city);
        tidy(&mut self.phone_number);
        self.email = self.email.trim().to_lowercase();
    }

    /// Splits into the new profile and the plaintext password.
    pub fn into_parts(self) -> (Adventurer, String) {
        let adventurer = Adventurer {
            id: new_id(),
            first_name: self.first_name,
            last_name: self.last_name,
            gender: self.gender,
            age: self.age,
            city: self.city,
            email: self.email,
            phone_number: self.phone_number,
            role: Role::Adventurer,
        };

        (adventurer, self.password)
    }
}

/// Profile edits. Unknown keys such as `email`, `password` or `role` are dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdventurerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl AdventurerPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.gender.is_none()
            && self.age.is_none()
            && self.city.is_none()
            && self.phone_number.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: String,
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,
    /// Business registration id, used to log in.
    #[validate(length(min = 1, message = "Company ID is required"))]
    pub company_id: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub years_in_business: u32,
    #[validate(regex(path = *EMAIL_PATTERN, message = "Please provide a valid email"))]
    pub email: String,
    #[validate(regex(path = *PHONE_PATTERN, message = "Please provide a valid Jordanian phone number"))]
    pub phone_number: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub about_company: Option<String>,
    pub role: Role,
}

impl Profile for Company {
    const ROLE: Role = Role::Company;

    fn id(&self) -> &str {
        &self.id
    }

    fn email(&self) -> &str {
        &self.email
    }
}

impl Company {
    pub fn apply(&mut self, patch: CompanyPatch) {
        if let Some(company_name) = patch.company_name {
            self.company_name = company_name.trim().to_string();
        }
        if let Some(company_id) = patch.company_id {
            self.company_id = company_id.trim().to_string();
        }
        if let Some(location) = patch.location {
            self.location = location.trim().to_string();
        }
        if let Some(years_in_business) = patch.years_in_business {
            self.years_in_business = years_in_business;
        }
        if let Some(phone_number) = patch.phone_number {
            self.phone_number = phone_number.trim().to_string();
        }
        if patch.website.is_some() {
            self.website = patch.website;
            tidy_optional(&mut self.website);
        }
        if patch.about_company.is_some() {
            self.about_company = patch.about_company;
            tidy_optional(&mut self.about_company);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanySignup {
    #[serde(default)]
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Company ID is required"))]
    pub company_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub years_in_business: u32,
    #[serde(default)]
    #[validate(regex(path = *EMAIL_PATTERN, message = "Please provide a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(regex(path = *PHONE_PATTERN, message = "Please provide a valid Jordanian phone number"))]
    pub phone_number: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub about_company: Option<String>,
}

impl CompanySignup {
    pub fn normalize(&mut self) {
        tidy(&mut self.company_name);
        tidy(&mut self.company_id);
        tidy(&mut self.location);
        tidy(&mut self.phone_number);
        tidy_optional(&mut self.website);
        tidy_optional(&mut self.about_company);
        self.email = self.email.trim().to_lowercase();
    }

    pub fn into_parts(self) -> (Company, String) {
        let company = Company {
            id: new_id(),
            company_name: self.company_name,
            company_id: self.company_id,
            location: self.location,
            years_in_business: self.years_in_business,
            email: self.email,
            phone_number: self.phone_number,
            website: self.website,
            about_company: self.about_company,
            role: Role::Company,
        };

        (company, self.password)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_in_business: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_company: Option<String>,
}

impl CompanyPatch {
    pub fn is_empty(&self) -> bool {
        self.company_name.is_none()
            && self.company_id.is_none()
            && self.location.is_none()
            && self.years_in_business.is_none()
            && self.phone_number.is_none()
            && self.website.is_none()
            && self.about_company.is_none()
    }
}

/// Company as embedded in trip listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub company_name: String,
    pub location: String,
}

impl From<&Company> for CompanySummary {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id.clone(),
            company_name: company.company_name.clone(),
            location: company.location.clone(),
        }
    }
}

/// Company card shown to adventurers browsing operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyListing {
    #[serde(rename = "_id")]
    pub id: String,
    pub company_name: String,
    pub location: String,
    pub website: Option<String>,
    pub about_company: Option<String>,
}

impl From<&Company> for CompanyListing {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id.clone(),
            company_name: company.company_name.clone(),
            location: company.location.clone(),
            website: company.website.clone(),
            about_company: company.about_company.clone(),
        }
    }
}

/// Adventurers log in with their email.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AdventurerLogin {
    #[serde(default)]
    #[validate(regex(path = *EMAIL_PATTERN, message = "Please provide a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Companies log in with their business registration id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyLogin {
    #[serde(default)]
    #[validate(length(min = 1, message = "Company ID is required"))]
    pub company_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForgotPassword {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResetCode {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}
