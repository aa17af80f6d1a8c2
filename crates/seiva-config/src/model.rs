use std::fmt;

use serde::{de::Deserializer, Deserialize, Serialize};
use seiva_domain::{EducationCycle, Grade};

use crate::ConfigError;

/// School-wide settings. Every section falls back to its defaults when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub profile: SchoolProfile,
    pub academic: AcademicSettings,
    pub financial: FinancialSettings,
    pub system: SystemSettings,
    pub user: UserProfile,
}

impl Config {
    /// Monthly tuition for the cycle `grade` belongs to.
    pub fn tuition_for(&self, grade: Grade) -> f64 {
        match grade.cycle() {
            EducationCycle::First => self.financial.tuition_cycle1,
            EducationCycle::Second => self.financial.tuition_cycle2,
        }
    }

    /// Applies `section.field = raw`, parsing the value for the field's type.
    pub fn apply_setting(&mut self, key: &str, raw: &str) -> Result<(), ConfigError> {
        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| ConfigError::UnknownSetting(key.to_string()))?;
        let text = || Some(raw.to_string());
        match section {
            "profile" => {
                let mut patch = ProfilePatch::default();
                match field {
                    "name" => patch.name = text(),
                    "slogan" => patch.slogan = text(),
                    "nuit" => patch.nuit = text(),
                    "address" => patch.address = text(),
                    "email" => patch.email = text(),
                    "phone" => patch.phone = text(),
                    "logo" => patch.logo = text(),
                    _ => return Err(ConfigError::UnknownSetting(key.to_string())),
                }
                patch.apply_to(&mut self.profile);
            }
            "academic" => {
                let mut patch = AcademicPatch::default();
                match field {
                    "current_year" => patch.current_year = Some(parse_number(key, raw)?),
                    "grading_system" => {
                        patch.grading_system = Some(GradingSystem::parse(raw).ok_or_else(|| {
                            invalid(key, raw, "expected 0-20, 0-100 or A-F")
                        })?)
                    }
                    "passing_grade" => patch.passing_grade = Some(parse_number(key, raw)?),
                    "active_terms" => {
                        patch.active_terms = Some(
                            raw.split(',')
                                .map(str::trim)
                                .filter(|term| !term.is_empty())
                                .map(str::to_string)
                                .collect(),
                        )
                    }
                    _ => return Err(ConfigError::UnknownSetting(key.to_string())),
                }
                patch.apply_to(&mut self.academic);
            }
            "financial" => {
                let mut patch = FinancialPatch::default();
                match field {
                    "currency" => patch.currency = text(),
                    "due_day" => {
                        let day: u32 = parse_number(key, raw)?;
                        if !(1..=31).contains(&day) {
                            return Err(invalid(key, raw, "day must be between 1 and 31"));
                        }
                        patch.due_day = Some(day);
                    }
                    "late_fee" => patch.late_fee = Some(parse_amount(key, raw)?),
                    "tuition_cycle1" => patch.tuition_cycle1 = Some(parse_amount(key, raw)?),
                    "tuition_cycle2" => patch.tuition_cycle2 = Some(parse_amount(key, raw)?),
                    "bank_info" => patch.bank_info = Some(raw.replace("\\n", "\n")),
                    _ => return Err(ConfigError::UnknownSetting(key.to_string())),
                }
                patch.apply_to(&mut self.financial);
            }
            "system" => {
                let flag = Some(parse_flag(key, raw)?);
                let mut patch = SystemPatch::default();
                match field {
                    "maintenance_mode" => patch.maintenance_mode = flag,
                    "email_alerts" => patch.email_alerts = flag,
                    "sms_integration" => patch.sms_integration = flag,
                    _ => return Err(ConfigError::UnknownSetting(key.to_string())),
                }
                patch.apply_to(&mut self.system);
            }
            "user" => {
                let mut patch = UserPatch::default();
                match field {
                    "name" => patch.name = text(),
                    "role" => patch.role = text(),
                    "email" => patch.email = text(),
                    "avatar" => patch.avatar = text(),
                    _ => return Err(ConfigError::UnknownSetting(key.to_string())),
                }
                patch.apply_to(&mut self.user);
            }
            _ => return Err(ConfigError::UnknownSetting(key.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolProfile {
    pub name: String,
    pub slogan: String,
    pub nuit: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub logo: String,
}

impl Default for SchoolProfile {
    fn default() -> Self {
        Self {
            name: "Seiva da Nação".into(),
            slogan: "Gestão Integrada".into(),
            nuit: "400922811".into(),
            address: "Av. Julius Nyerere, 1342, Polana Cimento, Maputo".into(),
            email: "contacto@seiva.mz".into(),
            phone: "+258 84 123 4567".into(),
            logo: "https://ui-avatars.com/api/?name=SN&background=1152d4&color=fff&size=128&font-size=0.4"
                .into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum GradingSystem {
    #[default]
    #[serde(rename = "0-20")]
    Scale20,
    #[serde(rename = "0-100")]
    Scale100,
    #[serde(rename = "A-F")]
    Letters,
}

impl GradingSystem {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "0-20" => Some(GradingSystem::Scale20),
            "0-100" => Some(GradingSystem::Scale100),
            "A-F" => Some(GradingSystem::Letters),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GradingSystem::Scale20 => "0-20",
            GradingSystem::Scale100 => "0-100",
            GradingSystem::Letters => "A-F",
        }
    }
}

impl fmt::Display for GradingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for GradingSystem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .as_deref()
            .and_then(GradingSystem::parse)
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademicSettings {
    pub current_year: i32,
    pub grading_system: GradingSystem,
    pub passing_grade: u32,
    pub active_terms: Vec<String>,
}

impl Default for AcademicSettings {
    fn default() -> Self {
        Self {
            current_year: 2024,
            grading_system: GradingSystem::default(),
            passing_grade: 10,
            active_terms: vec!["1".into(), "2".into()],
        }
    }
}

/// Billing parameters. `due_day` is shown to guardians; the status rules use a fixed day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialSettings {
    pub currency: String,
    pub due_day: u32,
    /// Percentage charged on late tuition.
    pub late_fee: f64,
    pub tuition_cycle1: f64,
    pub tuition_cycle2: f64,
    pub bank_info: String,
}

impl Default for FinancialSettings {
    fn default() -> Self {
        Self {
            currency: "MT - Metical".into(),
            due_day: 5,
            late_fee: 10.0,
            tuition_cycle1: 5000.0,
            tuition_cycle2: 6500.0,
            bank_info: "Millennium Bim\nConta: 123456789\nNIB: 000100001234567890123".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSettings {
    pub maintenance_mode: bool,
    pub email_alerts: bool,
    pub sms_integration: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            maintenance_mode: false,
            email_alerts: true,
            sms_integration: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub role: String,
    pub email: String,
    pub avatar: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Ricardo Mendes".into(),
            role: "Administrador".into(),
            email: "ricardo@seiva.mz".into(),
            avatar: "https://ui-avatars.com/api/?name=Ricardo+Mendes&background=random".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub slogan: Option<String>,
    pub nuit: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub logo: Option<String>,
}

impl ProfilePatch {
    pub fn apply_to(self, profile: &mut SchoolProfile) {
        merge(&mut profile.name, self.name);
        merge(&mut profile.slogan, self.slogan);
        merge(&mut profile.nuit, self.nuit);
        merge(&mut profile.address, self.address);
        merge(&mut profile.email, self.email);
        merge(&mut profile.phone, self.phone);
        merge(&mut profile.logo, self.logo);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcademicPatch {
    pub current_year: Option<i32>,
    pub grading_system: Option<GradingSystem>,
    pub passing_grade: Option<u32>,
    pub active_terms: Option<Vec<String>>,
}

impl AcademicPatch {
    pub fn apply_to(self, academic: &mut AcademicSettings) {
        merge(&mut academic.current_year, self.current_year);
        merge(&mut academic.grading_system, self.grading_system);
        merge(&mut academic.passing_grade, self.passing_grade);
        merge(&mut academic.active_terms, self.active_terms);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialPatch {
    pub currency: Option<String>,
    pub due_day: Option<u32>,
    pub late_fee: Option<f64>,
    pub tuition_cycle1: Option<f64>,
    pub tuition_cycle2: Option<f64>,
    pub bank_info: Option<String>,
}

impl FinancialPatch {
    pub fn apply_to(self, financial: &mut FinancialSettings) {
        merge(&mut financial.currency, self.currency);
        merge(&mut financial.due_day, self.due_day);
        merge(&mut financial.late_fee, self.late_fee);
        merge(&mut financial.tuition_cycle1, self.tuition_cycle1);
        merge(&mut financial.tuition_cycle2, self.tuition_cycle2);
        merge(&mut financial.bank_info, self.bank_info);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemPatch {
    pub maintenance_mode: Option<bool>,
    pub email_alerts: Option<bool>,
    pub sms_integration: Option<bool>,
}

impl SystemPatch {
    pub fn apply_to(self, system: &mut SystemSettings) {
        merge(&mut system.maintenance_mode, self.maintenance_mode);
        merge(&mut system.email_alerts, self.email_alerts);
        merge(&mut system.sms_integration, self.sms_integration);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

impl UserPatch {
    pub fn apply_to(self, user: &mut UserProfile) {
        merge(&mut user.name, self.name);
        merge(&mut user.role, self.role);
        merge(&mut user.email, self.email);
        merge(&mut user.avatar, self.avatar);
    }
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| invalid(key, raw, "expected a whole number"))
}

fn parse_amount(key: &str, raw: &str) -> Result<f64, ConfigError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(key, raw, "expected a number"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(invalid(key, raw, "must be zero or positive"))
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "sim" | "1" => Ok(true),
        "false" | "off" | "no" | "não" | "nao" | "0" => Ok(false),
        _ => Err(invalid(key, raw, "expected on/off")),
    }
}
