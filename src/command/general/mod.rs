//! General commands: identification of the module and the SIM
pub mod responses;
pub mod types;

use atat::atat_derive::AtatCmd;
use atat::{AtatCmd, InternalError};

use super::{text_response, AtCmd};
use responses::{CCID, CIMI, IMEI, Revision};

/// IMEI identification +CGSN=1
///
/// Returns the International Mobile Equipment Identity of the module,
/// quoted: `+CGSN: "352656100367872"`.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CGSN=1", IMEI)]
pub struct GetIMEI;

impl AtCmd for GetIMEI {}

/// Firmware version identification +CGMR
///
/// The version is answered bare, on a line of its own.
#[derive(Debug, Clone)]
pub struct GetFirmwareVersion;

impl AtatCmd for GetFirmwareVersion {
    type Response = Revision;

    const MAX_LEN: usize = "AT+CGMR\r\n".len();

    fn write(&self, buf: &mut [u8]) -> usize {
        write_bare(buf, b"AT+CGMR\r\n")
    }

    fn parse(&self, resp: Result<&[u8], InternalError>) -> Result<Revision, atat::Error> {
        Ok(Revision {
            version: text_response(resp)?,
        })
    }
}

impl AtCmd for GetFirmwareVersion {}

/// Card identification #ICCID
///
/// Returns the serial number identifying the SIM: `#ICCID: <iccid>`. The
/// number may carry hex digits and is not quoted.
#[derive(Debug, Clone)]
pub struct GetCCID;

impl AtatCmd for GetCCID {
    type Response = CCID;

    const MAX_LEN: usize = "AT#ICCID\r\n".len();

    fn write(&self, buf: &mut [u8]) -> usize {
        write_bare(buf, b"AT#ICCID\r\n")
    }

    fn parse(&self, resp: Result<&[u8], InternalError>) -> Result<CCID, atat::Error> {
        let ccid = text_response(resp)?;
        if !ccid.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(atat::Error::Parse);
        }
        Ok(CCID { ccid })
    }
}

impl AtCmd for GetCCID {
    const LINES: u8 = 3;
}

/// International mobile subscriber identification +CIMI
///
/// The IMSI is returned bare, on a line of its own. It is kept as text so
/// leading zeros survive.
#[derive(Debug, Clone)]
pub struct GetIMSI;

impl AtatCmd for GetIMSI {
    type Response = CIMI;

    const MAX_LEN: usize = "AT+CIMI\r\n".len();

    fn write(&self, buf: &mut [u8]) -> usize {
        write_bare(buf, b"AT+CIMI\r\n")
    }

    fn parse(&self, resp: Result<&[u8], InternalError>) -> Result<CIMI, atat::Error> {
        let imsi = text_response(resp)?;
        if !imsi.bytes().all(|b| b.is_ascii_digit()) {
            return Err(atat::Error::Parse);
        }
        Ok(CIMI { imsi })
    }
}

impl AtCmd for GetIMSI {
    const LINES: u8 = 3;
}

fn write_bare(buf: &mut [u8], cmd: &[u8]) -> usize {
    let len = cmd.len().min(buf.len());
    buf[..len].copy_from_slice(&cmd[..len]);
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::render;

    #[test]
    fn renders() {
        assert_eq!(render(&GetIMEI).unwrap().as_str(), "AT+CGSN=1");
        assert_eq!(render(&GetCCID).unwrap().as_str(), "AT#ICCID");
        assert_eq!(render(&GetIMSI).unwrap().as_str(), "AT+CIMI");
        assert_eq!(render(&GetFirmwareVersion).unwrap().as_str(), "AT+CGMR");
        assert_eq!(GetCCID::LINES, 3);
        assert_eq!(GetIMSI::LINES, 3);
        assert_eq!(GetIMEI::LINES, 1);
    }

    #[test]
    fn parses_imei() {
        let imei = GetIMEI.parse(Ok(&b"\"352656100367872\""[..])).unwrap();
        assert_eq!(imei.imei.as_str(), "352656100367872");
    }

    #[test]
    fn parses_iccid() {
        let ccid = GetCCID.parse(Ok(&b"898600220909A0206023"[..])).unwrap();
        assert_eq!(ccid.ccid.as_str(), "898600220909A0206023");
        assert!(GetCCID.parse(Ok(&b"ERROR"[..])).is_err());
        assert!(GetCCID.parse(Ok(&b""[..])).is_err());
    }

    #[test]
    fn parses_imsi() {
        let cimi = GetIMSI.parse(Ok(&b"001010123456789"[..])).unwrap();
        assert_eq!(cimi.imsi.as_str(), "001010123456789");
        assert!(GetIMSI.parse(Ok(&b"ERROR"[..])).is_err());
    }

    #[test]
    fn parses_firmware_version() {
        let rev = GetFirmwareVersion.parse(Ok(&b"mfw_nrf9160_1.3.1"[..])).unwrap();
        assert_eq!(rev.version.as_str(), "mfw_nrf9160_1.3.1");
    }
}
