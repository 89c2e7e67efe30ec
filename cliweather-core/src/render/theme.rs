//! Text decoration by semantic role. `Plain` is the identity, `Ansi` wraps
//! each token in an SGR escape and a reset.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Bold,
    Dim,
    Header,
    Label,
    Value,
    Hot,
    Cold,
    Warn,
}

pub trait Theme: Send + Sync {
    fn wrap(&self, role: Role, text: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

#[derive(Debug, Clone, Copy, Default)]
pub struct Ansi;

const RESET: &str = "\x1b[0m";

impl Ansi {
    fn code(role: Role) -> &'static str {
        match role {
            Role::Bold => "\x1b[1m",
            Role::Dim => "\x1b[90m",
            Role::Header => "\x1b[96m", // bright cyan
            Role::Label => "\x1b[37m",
            Role::Value => "\x1b[97m", // bright white
            Role::Hot => "\x1b[31m",
            Role::Cold => "\x1b[34m",
            Role::Warn => "\x1b[33m",
        }
    }
}

impl Theme for Plain {
    fn wrap(&self, _role: Role, text: &str) -> String {
        text.to_string()
    }
}

impl Theme for Ansi {
    fn wrap(&self, role: Role, text: &str) -> String {
        format!("{}{text}{RESET}", Self::code(role))
    }
}

pub fn theme_for(color: bool) -> &'static dyn Theme {
    if color { &Ansi } else { &Plain }
}

/// Celsius thresholds: >= 30 hot, <= 10 cold.
pub fn temperature_role(celsius: f64) -> Role {
    if celsius >= 30.0 {
        Role::Hot
    } else if celsius <= 10.0 {
        Role::Cold
    } else {
        Role::Value
    }
}

pub fn rain_role(percent: f64) -> Role {
    if percent >= 60.0 {
        Role::Warn
    } else if percent >= 20.0 {
        Role::Value
    } else {
        Role::Dim
    }
}
