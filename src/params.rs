//! Query parameter domains and their Cartesian product.
//!
//! Each parameter is drawn from a fixed domain; one [`Combination`] pins all
//! six and identifies exactly one fetch request and one output file.

use clap::ValueEnum;
use std::fmt;

/// Input methods accepted by the rates endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputMethod {
    #[value(name = "PC")]
    Pc,
    #[value(name = "Controller")]
    Controller,
}

impl InputMethod {
    pub const ALL: [Self; 2] = [Self::Pc, Self::Controller];

    /// The exact value the endpoint expects.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pc => "PC",
            Self::Controller => "Controller",
        }
    }
}

impl fmt::Display for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Regions the endpoint reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Region {
    #[value(name = "Europe")]
    Europe,
    #[value(name = "US")]
    Us,
    #[value(name = "Asia")]
    Asia,
}

impl Region {
    pub const ALL: [Self; 3] = [Self::Europe, Self::Us, Self::Asia];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Europe => "Europe",
            Self::Us => "US",
            Self::Asia => "Asia",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Role {
    #[value(name = "All")]
    All,
    #[value(name = "Damage")]
    Damage,
    #[value(name = "Tank")]
    Tank,
    #[value(name = "Support")]
    Support,
}

impl Role {
    pub const ALL: [Self; 4] = [Self::All, Self::Damage, Self::Tank, Self::Support];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Damage => "Damage",
            Self::Tank => "Tank",
            Self::Support => "Support",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Competitive tier filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tier {
    #[value(name = "All")]
    All,
    #[value(name = "Bronze")]
    Bronze,
    #[value(name = "Silver")]
    Silver,
    #[value(name = "Gold")]
    Gold,
    #[value(name = "Platinum")]
    Platinum,
    #[value(name = "Diamond")]
    Diamond,
    #[value(name = "Master")]
    Master,
    #[value(name = "Grandmaster")]
    Grandmaster,
}

impl Tier {
    pub const ALL: [Self; 8] = [
        Self::All,
        Self::Bronze,
        Self::Silver,
        Self::Gold,
        Self::Platinum,
        Self::Diamond,
        Self::Master,
        Self::Grandmaster,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
            Self::Diamond => "Diamond",
            Self::Master => "Master",
            Self::Grandmaster => "Grandmaster",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map slugs enumerated in a full harvest. Extend with specific map slugs as
/// needed; single mode accepts any slug directly.
pub const MAPS: [&str; 1] = ["all-maps"];

/// Role-queue flag domain.
pub const RQ_FLAGS: [u8; 2] = [0, 1];

/// One concrete assignment of all six query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub input: InputMethod,
    pub map: String,
    pub region: Region,
    pub role: Role,
    pub rq: u8,
    pub tier: Tier,
}

impl Combination {
    /// The full Cartesian product of all parameter domains, in
    /// input × map × region × role × rq × tier order.
    pub fn enumerate_all() -> Vec<Combination> {
        let mut combinations = Vec::new();
        for input in InputMethod::ALL {
            for map in MAPS {
                for region in Region::ALL {
                    for role in Role::ALL {
                        for rq in RQ_FLAGS {
                            for tier in Tier::ALL {
                                combinations.push(Combination {
                                    input,
                                    map: map.to_string(),
                                    region,
                                    role,
                                    rq,
                                    tier,
                                });
                            }
                        }
                    }
                }
            }
        }
        combinations
    }

    /// Deterministic output file name: lower-cased, spaces become hyphens.
    pub fn file_name(&self) -> String {
        format!(
            "stats_input-{}_map-{}_region-{}_role-{}_rq-{}_tier-{}.csv",
            self.input, self.map, self.region, self.role, self.rq, self.tier
        )
        .replace(' ', "-")
        .to_lowercase()
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "input={} map={} region={} role={} rq={} tier={}",
            self.input, self.map, self.region, self.role, self.rq, self.tier
        )
    }
}
