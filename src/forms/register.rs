use tracing::{info, instrument, warn};

use super::validation::{FieldError, FormError, Pattern, Rule, Touched, ValidationErrors};
use crate::clients::AuthClient;
use crate::domain::{AuthResponse, CompanySize, RegisterCompany, RegisterRequest};

pub const INDUSTRIES: [&str; 9] = [
    "Retail",
    "E-commerce",
    "Manufacturing",
    "Hospitality",
    "Healthcare",
    "Education",
    "Non-profit",
    "Government",
    "Other",
];

pub const DEPARTMENTS: [&str; 11] = [
    "Administration",
    "Marketing",
    "Sales",
    "HR",
    "IT",
    "Finance",
    "Operations",
    "Customer Service",
    "Procurement",
    "Management",
    "Other",
];

pub fn company_sizes() -> impl Iterator<Item = &'static str> {
    CompanySize::ALL.into_iter().map(|s| s.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Personal = 1,
    Position = 2,
    Company = 3,
}

impl WizardStep {
    pub const TOTAL: usize = 3;

    pub fn number(&self) -> usize {
        *self as usize
    }

    fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Personal => Some(WizardStep::Position),
            WizardStep::Position => Some(WizardStep::Company),
            WizardStep::Company => None,
        }
    }

    fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Personal => None,
            WizardStep::Position => Some(WizardStep::Personal),
            WizardStep::Company => Some(WizardStep::Position),
        }
    }

    fn fields(&self) -> &'static [&'static str] {
        match self {
            WizardStep::Personal => &["firstName", "lastName", "email", "password", "confirmPassword", "phone"],
            WizardStep::Position => &["jobTitle", "department", "employeeId"],
            WizardStep::Company => &[
                "companyName",
                "companyEmail",
                "companyPhone",
                "companyAddress",
                "industry",
                "companySize",
                "website",
                "agreeToTerms",
                "marketingConsent",
            ],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
}

impl PersonalInfo {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.check("firstName", &self.first_name, &[Rule::Required, Rule::MinLength(2)]);
        errors.check("lastName", &self.last_name, &[Rule::Required, Rule::MinLength(2)]);
        errors.check("email", &self.email, &[Rule::Required, Rule::Email]);
        errors.check("password", &self.password, &[Rule::Required, Rule::MinLength(8)]);
        errors.check("confirmPassword", &self.confirm_password, &[Rule::Required]);
        errors.check("phone", &self.phone, &[Rule::Required, Rule::Pattern(Pattern::InternationalPhone)]);
        if self.password != self.confirm_password {
            errors.add("confirmPassword", FieldError::PasswordMismatch);
        }
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionInfo {
    pub job_title: String,
    pub department: String,
    pub employee_id: String,
}

impl PositionInfo {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.check("jobTitle", &self.job_title, &[Rule::Required, Rule::MinLength(2)]);
        errors.check("department", &self.department, &[Rule::Required]);
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyInfo {
    pub company_name: String,
    pub company_email: String,
    pub company_phone: String,
    pub company_address: String,
    pub industry: String,
    pub company_size: String,
    pub website: String,
    pub agree_to_terms: bool,
    pub marketing_consent: bool,
}

impl CompanyInfo {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.check("companyName", &self.company_name, &[Rule::Required, Rule::MinLength(2)]);
        errors.check("companyEmail", &self.company_email, &[Rule::Required, Rule::Email]);
        errors.check(
            "companyPhone",
            &self.company_phone,
            &[Rule::Required, Rule::Pattern(Pattern::InternationalPhone)],
        );
        errors.check("companyAddress", &self.company_address, &[Rule::Required, Rule::MinLength(5)]);
        errors.check("industry", &self.industry, &[Rule::Required]);
        errors.check("companySize", &self.company_size, &[Rule::Required]);
        if !self.agree_to_terms {
            errors.add("agreeToTerms", FieldError::MustAccept);
        }
        errors
    }
}

/// Three-step sign-up: personal details, position, then company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationWizard {
    step: WizardStep,
    pub personal: PersonalInfo,
    pub position: PositionInfo,
    pub company: CompanyInfo,
    touched: Touched,
    error_message: Option<String>,
    submitting: bool,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Personal,
            personal: PersonalInfo::default(),
            position: PositionInfo::default(),
            company: CompanyInfo::default(),
            touched: Touched::default(),
            error_message: None,
            submitting: false,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn touch(&mut self, field: &'static str) {
        self.touched.mark(field);
    }

    pub fn step_errors(&self, step: WizardStep) -> ValidationErrors {
        match step {
            WizardStep::Personal => self.personal.validate(),
            WizardStep::Position => self.position.validate(),
            WizardStep::Company => self.company.validate(),
        }
    }

    /// Message for `field` once it has been touched.
    pub fn field_error(&self, field: &'static str) -> Option<String> {
        let mut errors = self.personal.validate();
        errors.merge(self.position.validate());
        errors.merge(self.company.validate());
        self.touched.visible_error(&errors, field, field)
    }

    /// Advances when the current step is valid; otherwise marks its fields
    /// touched and stays. Returns whether the step changed.
    pub fn next_step(&mut self) -> bool {
        if !self.step_errors(self.step).is_empty() {
            self.touched.mark_all(self.step.fields());
            return false;
        }
        match self.step.next() {
            Some(next) => {
                self.step = next;
                true
            }
            None => false,
        }
    }

    pub fn previous_step(&mut self) -> bool {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }

    /// All three steps validated together.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.personal.validate();
        errors.merge(self.position.validate());
        errors.merge(self.company.validate());
        errors.into_result()
    }

    pub fn to_request(&self) -> RegisterRequest {
        let employee_id = Some(self.position.employee_id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        RegisterRequest {
            email: self.personal.email.clone(),
            password: self.personal.password.clone(),
            first_name: self.personal.first_name.clone(),
            last_name: self.personal.last_name.clone(),
            phone: self.personal.phone.clone(),
            job_title: self.position.job_title.clone(),
            department: self.position.department.clone(),
            employee_id,
            company: RegisterCompany {
                name: self.company.company_name.clone(),
                email: self.company.company_email.clone(),
                phone: self.company.company_phone.clone(),
                address: self.company.company_address.clone(),
                industry: self.company.industry.clone(),
                size: self.company.company_size.clone(),
                website: Some(self.company.website.clone()),
            },
        }
    }

    /// Validates every step and registers the account. The session is
    /// established by the auth client on success.
    #[instrument(skip(self, auth), fields(email = %self.personal.email))]
    pub async fn submit(&mut self, auth: &AuthClient) -> Result<AuthResponse, FormError> {
        if let Err(errors) = self.validate() {
            for step in [WizardStep::Personal, WizardStep::Position, WizardStep::Company] {
                self.touched.mark_all(step.fields());
            }
            self.error_message = Some(FormError::Invalid(errors.clone()).to_string());
            return Err(FormError::Invalid(errors));
        }

        self.submitting = true;
        self.error_message = None;
        let result = auth.register(&self.to_request()).await;
        self.submitting = false;

        match result {
            Ok(response) => {
                info!("Registration successful");
                Ok(response)
            }
            Err(e) => {
                warn!(error = %e, "Registration failed");
                self.error_message = Some(match &e {
                    crate::error::ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
                    _ => "Registration failed. Please try again.".to_string(),
                });
                Err(FormError::Api(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_wizard() -> RegistrationWizard {
        let mut wizard = RegistrationWizard::new();
        wizard.personal = PersonalInfo {
            first_name: "Nia".into(),
            last_name: "Okafor".into(),
            email: "nia@shop.test".into(),
            password: "s3cretpass".into(),
            confirm_password: "s3cretpass".into(),
            phone: "+2348012345678".into(),
        };
        wizard.position = PositionInfo {
            job_title: "Buyer".into(),
            department: "Procurement".into(),
            employee_id: String::new(),
        };
        wizard.company = CompanyInfo {
            company_name: "Okafor Goods".into(),
            company_email: "hello@okafor.test".into(),
            company_phone: "+2348099999999".into(),
            company_address: "12 Marina Rd".into(),
            industry: "Retail".into(),
            company_size: "11-50".into(),
            website: String::new(),
            agree_to_terms: true,
            marketing_consent: false,
        };
        wizard
    }

    #[test]
    fn test_forward_blocked_until_step_valid() {
        let mut wizard = RegistrationWizard::new();
        assert!(!wizard.next_step());
        assert_eq!(wizard.step(), WizardStep::Personal);
        assert_eq!(wizard.field_error("firstName").as_deref(), Some("firstName is required"));

        wizard.personal = filled_wizard().personal;
        assert!(wizard.next_step());
        assert_eq!(wizard.step(), WizardStep::Position);
        assert!(wizard.previous_step());
        assert!(!wizard.previous_step());
    }

    #[test]
    fn test_password_mismatch_is_reported() {
        let mut wizard = filled_wizard();
        wizard.personal.confirm_password = "different1".into();
        assert!(!wizard.next_step());
        assert_eq!(wizard.field_error("confirmPassword").as_deref(), Some("Passwords do not match"));
    }

    #[test]
    fn test_request_omits_blank_employee_id() {
        let wizard = filled_wizard();
        assert!(wizard.validate().is_ok());
        let request = wizard.to_request();
        assert_eq!(request.employee_id, None);
        assert_eq!(request.company.size, "11-50");
        assert_eq!(request.company.website.as_deref(), Some(""));
        assert!(company_sizes().any(|s| s == "1000+"));
    }

    #[test]
    fn test_terms_must_be_accepted() {
        let mut wizard = filled_wizard();
        wizard.company.agree_to_terms = false;
        let errors = wizard.validate().unwrap_err();
        assert_eq!(errors.get("agreeToTerms"), Some(&FieldError::MustAccept));
    }
}
