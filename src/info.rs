//! Identity and status queries.
//!
//! Every query comes in two flavours: `try_<field>` reports why a query
//! failed, `<field>` logs the failure and falls back to an empty string or
//! zero.

use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};

use crate::client::Device;
use crate::command::general::types::{FirmwareVersion, Iccid, Imei, Imsi};
use crate::command::general::{GetCCID, GetFirmwareVersion, GetIMEI, GetIMSI};
use crate::command::mobile_control::{GetBatteryVoltage, GetSimState};
use crate::command::network_service::types::OperatorId;
use crate::command::network_service::{GetExtendedSignalQuality, GetOperatorSelection};
use crate::config::CellularConfig;
use crate::error::Error;
use crate::logger::Logger;
use crate::watchdog::Watchdog;

impl<T, D, C, L, W> Device<T, D, C, L, W>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
    C: CellularConfig,
    L: Logger,
    W: Watchdog,
{
    pub fn try_imei(&mut self) -> Result<Imei, Error> {
        Ok(self.ch.query(&GetIMEI)?.imei)
    }

    pub fn imei(&mut self) -> Imei {
        let res = self.try_imei();
        self.or_unavailable("IMEI", res)
    }

    /// Operator the module is registered with, as reported by +COPS: the
    /// MCC and MNC digits, or the operator name in alphanumeric format.
    pub fn try_operator_id(&mut self) -> Result<OperatorId, Error> {
        self.ch
            .query(&GetOperatorSelection)?
            .oper
            .ok_or(Error::UnrecognizedReply)
    }

    pub fn operator_id(&mut self) -> OperatorId {
        let res = self.try_operator_id();
        self.or_unavailable("Operator", res)
    }

    /// Received signal strength index from +CESQ.
    pub fn try_rssi(&mut self) -> Result<u8, Error> {
        Ok(self.ch.query(&GetExtendedSignalQuality)?.rsrp)
    }

    pub fn rssi(&mut self) -> u8 {
        let res = self.try_rssi();
        self.or_unavailable("RSSI", res)
    }

    pub fn try_sim_iccid(&mut self) -> Result<Iccid, Error> {
        Ok(self.ch.query(&GetCCID)?.ccid)
    }

    pub fn sim_iccid(&mut self) -> Iccid {
        let res = self.try_sim_iccid();
        self.or_unavailable("ICCID", res)
    }

    pub fn try_sim_imsi(&mut self) -> Result<Imsi, Error> {
        Ok(self.ch.query(&GetIMSI)?.imsi)
    }

    pub fn sim_imsi(&mut self) -> Imsi {
        let res = self.try_sim_imsi();
        self.or_unavailable("IMSI", res)
    }

    /// Supply voltage in volts.
    pub fn try_battery_voltage(&mut self) -> Result<f64, Error> {
        Ok(self.ch.query(&GetBatteryVoltage)?.volts())
    }

    pub fn battery_voltage(&mut self) -> f64 {
        let res = self.try_battery_voltage();
        self.or_unavailable("Battery voltage", res)
    }

    pub fn try_firmware_version(&mut self) -> Result<FirmwareVersion, Error> {
        Ok(self.ch.query(&GetFirmwareVersion)?.version)
    }

    pub fn firmware_version(&mut self) -> FirmwareVersion {
        let res = self.try_firmware_version();
        self.or_unavailable("Firmware version", res)
    }

    /// Whether a SIM card is inserted. A failed query counts as absent.
    pub fn sim_present(&mut self) -> bool {
        match self.ch.query(&GetSimState) {
            Ok(sim) => sim.is_present(),
            Err(e) => {
                self.ch
                    .logger()
                    .debug(format_args!("SIM state query failed: {:?}", e));
                false
            }
        }
    }

    fn or_unavailable<V: Default>(&mut self, what: &str, res: Result<V, Error>) -> V {
        res.unwrap_or_else(|e| {
            self.ch
                .logger()
                .debug(format_args!("{} unavailable: {:?}", what, e));
            V::default()
        })
    }
}
