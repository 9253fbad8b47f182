//! Speech service regions.
//!
//! Each region exposes a WebSocket recognition host and an `issueToken`
//! endpoint for exchanging a subscription key for a bearer token.
//!
//! # Example
//!
//! ```rust
//! use speechlink::core::connection::SpeechRegion;
//!
//! let region: SpeechRegion = "westeurope".parse().unwrap();
//! assert_eq!(region, SpeechRegion::WestEurope);
//! assert_eq!(region.stt_hostname(), "westeurope.stt.speech.microsoft.com");
//! assert!(region.token_endpoint().ends_with("/sts/v1.0/issueToken"));
//! ```

/// A speech service region.
///
/// Regions without a named variant are carried by [`SpeechRegion::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpeechRegion {
    #[default]
    WestUS,
    WestUS2,
    EastUS,
    EastUS2,
    CentralUS,
    WestEurope,
    NorthEurope,
    UKSouth,
    EastAsia,
    SoutheastAsia,
    JapanEast,
    AustraliaEast,
    CanadaCentral,
    IndiaCentral,
    /// Any other region identifier, used verbatim.
    Custom(String),
}

impl SpeechRegion {
    /// The identifier used in service host names.
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            Self::WestUS => "westus",
            Self::WestUS2 => "westus2",
            Self::EastUS => "eastus",
            Self::EastUS2 => "eastus2",
            Self::CentralUS => "centralus",
            Self::WestEurope => "westeurope",
            Self::NorthEurope => "northeurope",
            Self::UKSouth => "uksouth",
            Self::EastAsia => "eastasia",
            Self::SoutheastAsia => "southeastasia",
            Self::JapanEast => "japaneast",
            Self::AustraliaEast => "australiaeast",
            Self::CanadaCentral => "canadacentral",
            Self::IndiaCentral => "centralindia",
            Self::Custom(region) => region.as_str(),
        }
    }

    /// Recognition host: `<region>.stt.speech.microsoft.com`
    #[inline]
    pub fn stt_hostname(&self) -> String {
        format!("{}.stt.speech.microsoft.com", self.as_str())
    }

    /// Token exchange URL:
    /// `https://<region>.api.cognitive.microsoft.com/sts/v1.0/issueToken`
    #[inline]
    pub fn token_endpoint(&self) -> String {
        format!(
            "https://{}.api.cognitive.microsoft.com/sts/v1.0/issueToken",
            self.as_str()
        )
    }
}

impl std::fmt::Display for SpeechRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SpeechRegion {
    type Err = std::convert::Infallible;

    /// Never fails; unknown identifiers become `Custom`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let region = match s.trim().to_lowercase().as_str() {
            "westus" => Self::WestUS,
            "westus2" => Self::WestUS2,
            "eastus" => Self::EastUS,
            "eastus2" => Self::EastUS2,
            "centralus" => Self::CentralUS,
            "westeurope" => Self::WestEurope,
            "northeurope" => Self::NorthEurope,
            "uksouth" => Self::UKSouth,
            "eastasia" => Self::EastAsia,
            "southeastasia" => Self::SoutheastAsia,
            "japaneast" => Self::JapanEast,
            "australiaeast" => Self::AustraliaEast,
            "canadacentral" => Self::CanadaCentral,
            "centralindia" => Self::IndiaCentral,
            _ => Self::Custom(s.trim().to_string()),
        };
        Ok(region)
    }
}
