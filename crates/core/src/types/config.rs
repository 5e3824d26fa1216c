//! Site-wide configuration edited from the admin panel.
//!
//! A single record drives the storefront chrome: social links in the
//! footer, contact details, and the WhatsApp number behind both the
//! floating contact button and checkout. Every field is a plain string
//! where `""` is the canonical "not configured" sentinel - unset links
//! simply hide their icon.

use serde::{Deserialize, Serialize};

use crate::validate::{self, FieldError, Issues};

/// Social network links. Wire format is camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinks {
    pub instagram: String,
    pub facebook: String,
    pub twitter: String,
    pub linkedin: String,
    pub tiktok: String,
    /// Number behind the contact button and the checkout link.
    pub whatsapp: String,
}

/// Contact details shown in the storefront footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// The singleton site configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    pub social_media: SocialLinks,
    pub contact: ContactInfo,
}

impl SiteConfig {
    /// The configured WhatsApp number, or `None` when unset.
    #[must_use]
    pub fn whatsapp_number(&self) -> Option<&str> {
        let number = self.social_media.whatsapp.trim();
        if number.is_empty() { None } else { Some(number) }
    }

    /// Validate every field, collecting all failures.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut issues = Issues::new();

        let links = [
            ("socialMedia.instagram", "URL de Instagram", &self.social_media.instagram),
            ("socialMedia.facebook", "URL de Facebook", &self.social_media.facebook),
            ("socialMedia.twitter", "URL de Twitter", &self.social_media.twitter),
            ("socialMedia.linkedin", "URL de LinkedIn", &self.social_media.linkedin),
            ("socialMedia.tiktok", "URL de TikTok", &self.social_media.tiktok),
        ];
        for (field, label, value) in links {
            issues.check(field, validate::optional_url(label, value));
        }

        issues.check("contact.email", validate::email(&self.contact.email));
        if self.contact.phone.is_empty() {
            issues.push("contact.phone", "Teléfono requerido");
        }

        issues.into_result()
    }
}
