//! Hardware interface abstraction
//!
//! The drawing core never talks to the panel. Finished planes are handed to a
//! [`DisplayInterface`], the transport contract a panel driver is built on:
//! command and data writes, a hardware reset, and a blocking wait for the
//! controller to become idle.
//!
//! [`Interface`] implements the contract for embedded-hal v1.0 peripherals.
//!
//! ## Hardware Requirements
//!
//! - SPI bus (MOSI + SCK); chip select is framed by the [`SpiDevice`]
//! - 3 GPIO pins:
//!   - **DC**: Data/Command select (output)
//!   - **RST**: Reset (output, active low)
//!   - **BUSY**: Busy status (input, active low on the 1.54" B panel)
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use epd1in54b::{DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! interface.set_busy_timeout(5_000);
//!
//! let _ = interface.reset(&mut delay);
//! let _ = interface.send_command(0x10);
//! let _ = interface.send_data(&[0xFF; 5000]);
//! let _ = interface.wait_until_idle(&mut delay);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

/// Transport contract of a panel driver
///
/// For most cases, use the provided [`Interface`] struct. Implement this
/// trait on your own type for other buses or pin arrangements.
pub trait DisplayInterface {
    /// Error type for interface operations
    type Error: Debug;

    /// Send a command byte (DC low)
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Send data bytes (DC high)
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Pulse the reset line: low, wait, high, wait
    ///
    /// # Errors
    ///
    /// Returns an error if the reset pin cannot be driven.
    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;

    /// Block until the controller reports idle
    ///
    /// # Errors
    ///
    /// Returns an error if the busy pin cannot be read or, when the
    /// implementation bounds the wait, the controller stays busy too long.
    fn wait_until_idle<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
    /// The controller stayed busy past the configured timeout
    Timeout,
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
            Self::Timeout => write!(f, "Timeout waiting for display"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Interval between BUSY samples in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 100;

/// Length of each phase of the reset pulse in milliseconds
pub const DEFAULT_RESET_PULSE_MS: u32 = 200;

/// embedded-hal v1.0 implementation of [`DisplayInterface`]
///
/// Defaults match the 1.54" B panel: BUSY is active low, sampled every
/// 100 ms, with no timeout; the reset pulse holds each level for 200 ms.
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`]
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `BUSY` - Busy pin implementing [`InputPin`]
pub struct Interface<SPI, DC, RST, BUSY> {
    spi: SPI,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
    busy: BUSY,
    /// Upper bound for `wait_until_idle` in milliseconds, 0 = wait forever
    busy_timeout_ms: u32,
    poll_interval_ms: u32,
    reset_pulse_ms: u32,
    /// Busy pin polarity (true = active high, false = active low)
    busy_active_high: bool,
}

impl<SPI, DC, RST, BUSY> Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    /// Create a new Interface with the panel defaults
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY) -> Self {
        Self {
            spi,
            dc,
            rst,
            busy,
            busy_timeout_ms: 0,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            reset_pulse_ms: DEFAULT_RESET_PULSE_MS,
            busy_active_high: false,
        }
    }

    /// Bound the busy wait, in milliseconds
    ///
    /// Default is 0, which waits until the panel is ready however long it
    /// takes.
    pub fn set_busy_timeout(&mut self, timeout_ms: u32) -> &mut Self {
        self.busy_timeout_ms = timeout_ms;
        self
    }

    /// Get the current busy-wait timeout in milliseconds
    pub fn busy_timeout(&self) -> u32 {
        self.busy_timeout_ms
    }

    /// Set the BUSY sampling interval in milliseconds (at least 1)
    pub fn set_poll_interval(&mut self, interval_ms: u32) -> &mut Self {
        self.poll_interval_ms = interval_ms.max(1);
        self
    }

    /// Get the BUSY sampling interval in milliseconds
    pub fn poll_interval(&self) -> u32 {
        self.poll_interval_ms
    }

    /// Set how long each level of the reset pulse is held, in milliseconds
    pub fn set_reset_pulse(&mut self, pulse_ms: u32) -> &mut Self {
        self.reset_pulse_ms = pulse_ms;
        self
    }

    /// Get the reset pulse length in milliseconds
    pub fn reset_pulse(&self) -> u32 {
        self.reset_pulse_ms
    }

    /// Set busy pin polarity
    ///
    /// Default is active-low. Set to true for panels that raise BUSY.
    pub fn set_busy_active_high(&mut self, active_high: bool) -> &mut Self {
        self.busy_active_high = active_high;
        self
    }

    /// Get busy pin polarity (true = active high)
    pub fn busy_active_high(&self) -> bool {
        self.busy_active_high
    }

    /// Release the peripherals
    pub fn release(self) -> (SPI, DC, RST, BUSY) {
        (self.spi, self.dc, self.rst, self.busy)
    }
}

impl<SPI, DC, RST, BUSY, PinErr> DisplayInterface for Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.dc.set_low().map_err(InterfaceError::Pin)?;
        self.spi.write(&[command]).map_err(InterfaceError::Spi)
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.dc.set_high().map_err(InterfaceError::Pin)?;
        self.spi.write(data).map_err(InterfaceError::Spi)
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        self.rst.set_low().map_err(InterfaceError::Pin)?;
        delay.delay_ms(self.reset_pulse_ms);
        self.rst.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_ms(self.reset_pulse_ms);
        Ok(())
    }

    fn wait_until_idle<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        let mut waited_ms = 0u32;

        loop {
            let is_busy = if self.busy_active_high {
                self.busy.is_high()
            } else {
                self.busy.is_low()
            }
            .map_err(InterfaceError::Pin)?;

            if !is_busy {
                return Ok(());
            }

            if self.busy_timeout_ms > 0 && waited_ms >= self.busy_timeout_ms {
                log::warn!("display still busy after {waited_ms} ms");
                return Err(InterfaceError::Timeout);
            }

            delay.delay_ms(self.poll_interval_ms);
            waited_ms = waited_ms.saturating_add(self.poll_interval_ms);
        }
    }
}
