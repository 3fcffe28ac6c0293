use core::str::FromStr;

const CME_PREFIX: &str = "CME ERROR: ";

/// Final result of a command, as classified from a framed reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResultCode {
    Ok,
    /// `+CME ERROR: <code>` with a numeric code.
    Cme(i16),
    /// Anything else, including verbose `+CME ERROR` texts.
    Unknown,
}

impl FromStr for ResultCode {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.contains("OK") {
            Self::Ok
        } else if let Some(idx) = s.find(CME_PREFIX) {
            let code = s[idx + CME_PREFIX.len()..].trim_start();
            let end = code
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(code.len());
            code[..end].parse().map(Self::Cme).unwrap_or(Self::Unknown)
        } else {
            Self::Unknown
        })
    }
}

impl ResultCode {
    /// Value recorded as the channel's last error code.
    pub fn code(&self) -> i16 {
        match self {
            Self::Ok => 0,
            Self::Cme(code) => *code,
            Self::Unknown => -1,
        }
    }
}
