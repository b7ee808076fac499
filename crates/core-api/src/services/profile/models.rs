use jodidar_database::{address, education, language, professional, profile};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Default)]
pub struct ProfileUpdate {
    pub gender: Option<String>,
    pub looking_for: Option<String>,
    pub height: Option<i32>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub linkedin_url: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct BirthDetailsInput {
    /// Month by name, e.g. "February"
    pub month: String,
    pub day: String,
    pub year: String,
    pub birth_time: Option<String>,
    pub birth_village: Option<String>,
    pub birth_city: Option<String>,
    pub birth_state: Option<String>,
    pub birth_country: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct AddressBody {
    pub address1: String,
    pub address2: Option<String>,
    pub address3: Option<String>,
    pub city_id: i32,
    pub state_id: i32,
    pub country_id: i32,
    pub zipcode: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct PhonesInput {
    /// Replaces the account phone when present
    pub primary: Option<String>,
    pub alternates: Vec<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Default)]
pub struct EducationBody {
    pub degree: Option<String>,
    pub specialization: Option<String>,
    pub university: Option<String>,
    pub institution: Option<String>,
    pub year_of_passing: Option<i32>,
    pub grade: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UniversityInput {
    pub university: String,
}

#[derive(Serialize, Deserialize, ToSchema, Default)]
pub struct ProfessionalUpdate {
    pub occupation: Option<String>,
    pub company_name: Option<String>,
    pub designation: Option<String>,
    pub years_of_experience: Option<i32>,
    pub package: Option<String>,
    pub turn_over: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LanguageBody {
    pub name: String,
    pub proficiency: Option<String>,
    pub certification: Option<String>,
    pub notes: Option<String>,
}

impl From<ProfileUpdate> for profile::UpdateModel {
    fn from(val: ProfileUpdate) -> Self {
        Self {
            gender: val.gender,
            looking_for: val.looking_for,
            height: val.height,
            bio: val.bio,
            profile_picture: val.profile_picture,
            linkedin_url: val.linkedin_url,
        }
    }
}

impl From<BirthDetailsInput> for profile::BirthDetails {
    fn from(val: BirthDetailsInput) -> Self {
        Self {
            month: val.month,
            day: val.day,
            year: val.year,
            birth_time: val.birth_time,
            birth_village: val.birth_village,
            birth_city: val.birth_city,
            birth_state: val.birth_state,
            birth_country: val.birth_country,
        }
    }
}

impl From<AddressBody> for address::AddressInput {
    fn from(val: AddressBody) -> Self {
        Self {
            address1: val.address1,
            address2: val.address2,
            address3: val.address3,
            city_id: val.city_id,
            state_id: val.state_id,
            country_id: val.country_id,
            zipcode: val.zipcode,
        }
    }
}

impl From<EducationBody> for education::EducationInput {
    fn from(val: EducationBody) -> Self {
        Self {
            degree: val.degree,
            specialization: val.specialization,
            university: val.university,
            institution: val.institution,
            year_of_passing: val.year_of_passing,
            grade: val.grade,
        }
    }
}

impl From<ProfessionalUpdate> for professional::UpdateModel {
    fn from(val: ProfessionalUpdate) -> Self {
        Self {
            occupation: val.occupation,
            company_name: val.company_name,
            designation: val.designation,
            years_of_experience: val.years_of_experience,
            package: val.package,
            turn_over: val.turn_over,
            location: val.location,
            employment_type: val.employment_type,
        }
    }
}

impl From<LanguageBody> for language::LanguageInput {
    fn from(val: LanguageBody) -> Self {
        Self {
            name: val.name,
            proficiency: val.proficiency,
            certification: val.certification,
            notes: val.notes,
        }
    }
}
