//! Identity values handed out by the driver
use heapless::String;

pub type Imei = String<15>;
pub type Iccid = String<22>;
pub type Imsi = String<15>;
pub type FirmwareVersion = String<32>;
