//! ISM7 sub-GHz radio (UART command interface)
//!
//! The ISM7 Click hosts a radio module that is controlled entirely through
//! framed packets on its UART. A typical operation is:
//!
//! 1. wait for the module's RTS line to go low (it is ready for input)
//! 2. send a request packet
//! 3. read packets until the matching confirmation arrives
//! 4. check the status byte of that confirmation
//!
//! The driver owns a single event slot. Every successful receive overwrites
//! it and every send clears it, so copy out whatever you need from
//! [`Ism7::event`] before issuing the next operation.
//!
//! All waits are polling loops over [`DelayNs`] ticks; there is no
//! cancellation and only one request can be outstanding at a time.

mod config;
mod error;

pub use config::Ism7Config;
pub use error::Ism7Error;

use click_hal::{InputPin, OutputPin, UartRx, UartTx};
use click_protocol::command::{self, cmd};
use click_protocol::packet::frame_checksum;
use click_protocol::{
    Event, Packet, PacketParser, Request, Setting, MAX_FRAME_SIZE, MAX_PAYLOAD_LEN, START_BYTE,
};
use embedded_hal::delay::DelayNs;

/// ISM7 driver context
///
/// - `U`: UART connected to the module
/// - `P`: the module's RTS output (active low: high means busy)
/// - `D`: delay provider used for every polling tick
pub struct Ism7<U, P, D> {
    uart: U,
    rts: P,
    delay: D,
    config: Ism7Config,
    event: Packet,
    parser: PacketParser,
}

impl<U, P, D> Ism7<U, P, D>
where
    U: UartTx + UartRx,
    P: InputPin,
    D: DelayNs,
{
    /// Create a driver over an already opened UART
    pub fn new(uart: U, rts: P, delay: D, config: Ism7Config) -> Self {
        Self {
            uart,
            rts,
            delay,
            config,
            event: Packet::default(),
            parser: PacketParser::new(),
        }
    }

    /// Tear down the driver and hand back its parts
    pub fn release(self) -> (U, P, D) {
        (self.uart, self.rts, self.delay)
    }

    /// Get the configuration
    pub fn config(&self) -> &Ism7Config {
        &self.config
    }

    /// Last packet received from the module
    pub fn event(&self) -> &Packet {
        &self.event
    }

    /// True when the module accepts input (RTS low)
    pub fn is_ready_to_send(&self) -> bool {
        self.rts.is_low()
    }

    /// Pulse the module's RST line and wait for it to boot
    pub fn hardware_reset<R: OutputPin>(&mut self, rst: &mut R) -> Result<(), Ism7Error<U::Error>> {
        debug!("ISM7: hardware reset");
        rst.set_low();
        self.delay.delay_ms(self.config.reset_pulse_ms);
        rst.set_high();
        self.delay.delay_ms(self.config.boot_delay_ms);
        self.discard_input()
    }

    // ---------------------------------------------------------------------
    // Transmit
    // ---------------------------------------------------------------------

    /// Send a command byte with its payload
    pub fn send_command(&mut self, command: u8, payload: &[u8]) -> Result<(), Ism7Error<U::Error>> {
        let packet = Packet::new(command, payload)?;
        self.send_packet(&packet)
    }

    /// Send a packet once RTS allows it
    ///
    /// Waits up to `rts_timeout_ticks` for RTS to clear. On timeout nothing
    /// is written and the receive side is left untouched. Otherwise pending
    /// input and the stored event are discarded before the frame goes out.
    pub fn send_packet(&mut self, packet: &Packet) -> Result<(), Ism7Error<U::Error>> {
        let mut frame = [0u8; MAX_FRAME_SIZE];
        let len = packet.encode(&mut frame)?;

        self.wait_ready()?;
        self.discard_input()?;

        self.uart
            .write_blocking(&frame[..len])
            .map_err(Ism7Error::Uart)?;
        trace!("ISM7 TX: cmd={=u8:#x} len={=u8}", packet.command, packet.len());
        Ok(())
    }

    fn wait_ready(&mut self) -> Result<(), Ism7Error<U::Error>> {
        let mut ticks = 0;
        while self.rts.is_high() {
            if ticks >= self.config.rts_timeout_ticks {
                warn!("ISM7: RTS still busy after {=u32} ticks", ticks);
                return Err(Ism7Error::Timeout);
            }
            ticks += 1;
            self.delay.delay_ms(self.config.tick_ms);
        }
        Ok(())
    }

    fn discard_input(&mut self) -> Result<(), Ism7Error<U::Error>> {
        self.uart.clear().map_err(Ism7Error::Uart)?;
        self.event.clear();
        self.parser.reset();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Receive
    // ---------------------------------------------------------------------

    /// Read the next well-formed packet into the event slot
    ///
    /// Bytes before the START marker are skipped. Any packet type is
    /// accepted. On a checksum mismatch the bytes are consumed but the
    /// event slot keeps its previous contents.
    ///
    /// The XOR trailer cannot catch every corrupted LENGTH byte: a shorter
    /// length can leave a payload byte in the checksum slot that happens
    /// to match, and the frame is then accepted with a short payload.
    pub fn read_packet(&mut self) -> Result<&Packet, Ism7Error<U::Error>> {
        self.receive()?;
        Ok(&self.event)
    }

    fn receive(&mut self) -> Result<(), Ism7Error<U::Error>> {
        if self.parser.in_packet() {
            return self.finish_pending();
        }

        // The idle budget restarts with every byte, so noise can be skipped
        // for as long as it keeps arriving.
        while self.read_byte_timed()? != START_BYTE {}

        let command = self.read_byte_timed()?;
        let length = self.read_byte_timed()? as usize;

        let mut payload = [0u8; MAX_PAYLOAD_LEN];
        if length > 0 {
            // One tick per expected byte, then take the payload in one go
            for _ in 0..length {
                self.delay.delay_ms(self.config.tick_ms);
            }
            let got = self
                .uart
                .read(&mut payload[..length])
                .map_err(Ism7Error::Uart)?;
            if got < length {
                warn!("ISM7 RX: payload truncated ({=usize}/{=usize})", got, length);
                return Err(Ism7Error::Truncated);
            }
        }

        let received = self.read_byte_timed()?;
        let expected = frame_checksum(command, &payload[..length]);
        if received != expected {
            warn!(
                "ISM7 RX: checksum mismatch cmd={=u8:#x} got={=u8:#x} want={=u8:#x}",
                command,
                received,
                expected
            );
            return Err(Ism7Error::ChecksumMismatch);
        }

        self.event = Packet::new(command, &payload[..length])?;
        trace!("ISM7 RX: cmd={=u8:#x} len={=usize}", command, length);
        Ok(())
    }

    /// Complete a frame that [`poll_event`](Self::poll_event) left half
    /// parsed. A timeout drops the partial frame.
    fn finish_pending(&mut self) -> Result<(), Ism7Error<U::Error>> {
        loop {
            let byte = match self.read_byte_timed() {
                Ok(byte) => byte,
                Err(e) => {
                    self.parser.reset();
                    return Err(e);
                }
            };
            if let Some(packet) = self.parser.feed(byte)? {
                self.event = packet;
                trace!("ISM7 RX: cmd={=u8:#x} len={=u8}", self.event.command, self.event.len());
                return Ok(());
            }
        }
    }

    fn read_byte_timed(&mut self) -> Result<u8, Ism7Error<U::Error>> {
        let mut idle = 0;
        loop {
            if let Some(byte) = self.uart.read_byte().map_err(Ism7Error::Uart)? {
                return Ok(byte);
            }
            if idle >= self.config.rx_timeout_ticks {
                return Err(Ism7Error::Timeout);
            }
            idle += 1;
            self.delay.delay_ms(self.config.tick_ms);
        }
    }

    /// Wait for a specific confirmation or indication
    ///
    /// Makes exactly `max_time_s` receive attempts; each one is a full
    /// [`read_packet`](Self::read_packet) with its own idle budget, so the
    /// argument is an attempt count rather than a deadline. Packets with
    /// other commands, timeouts and corrupt packets each use up one
    /// attempt. UART errors end the wait immediately.
    pub fn wait_for_event(
        &mut self,
        expected: u8,
        max_time_s: u8,
    ) -> Result<&Packet, Ism7Error<U::Error>> {
        if !command::is_event(expected) {
            return Err(Ism7Error::InvalidCommand(expected));
        }

        for _attempt in 0..max_time_s {
            match self.receive() {
                Ok(()) if self.event.command == expected => return Ok(&self.event),
                Ok(()) => {
                    trace!(
                        "ISM7: skipping cmd={=u8:#x} while waiting for {=u8:#x}",
                        self.event.command,
                        expected
                    );
                }
                Err(Ism7Error::Uart(e)) => return Err(Ism7Error::Uart(e)),
                Err(_) => {}
            }
        }

        debug!(
            "ISM7: no {=u8:#x} after {=u8} attempts",
            expected,
            max_time_s
        );
        Err(Ism7Error::Timeout)
    }

    /// Drain buffered input without blocking
    ///
    /// Returns the first complete packet found, which also becomes the
    /// stored event. A partial packet is kept in the parser and completed
    /// by the next `poll_event`, `read_packet` or `wait_for_event`. A send
    /// discards it.
    pub fn poll_event(&mut self) -> Result<Option<&Packet>, Ism7Error<U::Error>> {
        while let Some(byte) = self.uart.read_byte().map_err(Ism7Error::Uart)? {
            match self.parser.feed(byte) {
                Ok(Some(packet)) => {
                    self.event = packet;
                    return Ok(Some(&self.event));
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("ISM7 RX: dropped corrupt packet");
                    return Err(e.into());
                }
            }
        }
        Ok(None)
    }

    // ---------------------------------------------------------------------
    // Command/response operations
    // ---------------------------------------------------------------------

    /// Send a request and wait for its confirmation
    ///
    /// Fails with [`Ism7Error::Status`] if the confirmation reports a
    /// nonzero status. No retries are made.
    pub fn transact(
        &mut self,
        request: &Request<'_>,
        max_time_s: u8,
    ) -> Result<&Packet, Ism7Error<U::Error>> {
        let packet = request.to_packet()?;
        self.send_packet(&packet)?;
        self.wait_for_event(request.expected_response(), max_time_s)?;

        match self.event.status() {
            None => Err(Ism7Error::InvalidResponse),
            Some(0) => Ok(&self.event),
            Some(code) => {
                debug!(
                    "ISM7: cmd={=u8:#x} failed with status {=u8:#x}",
                    request.command(),
                    code
                );
                Err(Ism7Error::Status(code))
            }
        }
    }

    fn request(&mut self, request: Request<'_>) -> Result<(), Ism7Error<U::Error>> {
        let wait = self.config.response_wait_s;
        self.transact(&request, wait).map(|_| ())
    }

    /// Software reset
    pub fn reset(&mut self) -> Result<(), Ism7Error<U::Error>> {
        self.request(Request::Reset)
    }

    /// Restore the module's factory settings
    pub fn factory_reset(&mut self) -> Result<(), Ism7Error<U::Error>> {
        self.request(Request::FactoryReset)
    }

    /// Enter shutdown; only a hardware reset wakes the module again
    pub fn shutdown(&mut self) -> Result<(), Ism7Error<U::Error>> {
        self.request(Request::Shutdown)
    }

    /// Enter standby
    pub fn standby(&mut self) -> Result<(), Ism7Error<U::Error>> {
        self.request(Request::Standby)
    }

    /// Read a user setting into `out`, returning its length
    pub fn get_setting(
        &mut self,
        setting: Setting,
        out: &mut [u8],
    ) -> Result<usize, Ism7Error<U::Error>> {
        let wait = self.config.response_wait_s;
        let packet = self.transact(&Request::Get(setting), wait)?;

        let value = &packet.payload[1..];
        let dest = out
            .get_mut(..value.len())
            .ok_or(Ism7Error::BufferTooSmall)?;
        dest.copy_from_slice(value);
        Ok(value.len())
    }

    /// Write a user setting
    pub fn set_setting(&mut self, setting: Setting, value: &[u8]) -> Result<(), Ism7Error<U::Error>> {
        self.request(Request::Set { setting, value })
    }

    /// Transmit data to the configured destination
    pub fn send_data(&mut self, data: &[u8]) -> Result<(), Ism7Error<U::Error>> {
        self.request(Request::Data(data))
    }

    /// Transmit data to an explicit channel, network and address
    pub fn send_data_ex(
        &mut self,
        channel: u8,
        dest_net_id: u8,
        dest_addr: u8,
        data: &[u8],
    ) -> Result<(), Ism7Error<U::Error>> {
        self.request(Request::DataEx {
            channel,
            dest_net_id,
            dest_addr,
            data,
        })
    }

    /// Switch RF channel (volatile)
    pub fn set_channel(&mut self, channel: u8) -> Result<(), Ism7Error<U::Error>> {
        self.request(Request::SetChannel(channel))
    }

    /// Switch destination network (volatile)
    pub fn set_destination_net_id(&mut self, net_id: u8) -> Result<(), Ism7Error<U::Error>> {
        self.request(Request::SetDestNetId(net_id))
    }

    /// Switch destination address (volatile)
    pub fn set_destination_address(&mut self, addr: u8) -> Result<(), Ism7Error<U::Error>> {
        self.request(Request::SetDestAddr(addr))
    }

    /// Set output power (volatile)
    pub fn set_pa_power(&mut self, power: u8) -> Result<(), Ism7Error<U::Error>> {
        self.request(Request::SetPaPower(power))
    }

    /// RSSI of the last received packet in dBm
    pub fn rssi(&mut self) -> Result<i8, Ism7Error<U::Error>> {
        let wait = self.config.response_wait_s;
        let packet = self.transact(&Request::Rssi, wait)?;
        match Event::from_packet(packet)? {
            Event::RssiConfirm { rssi, .. } => Ok(rssi),
            _ => Err(Ism7Error::InvalidResponse),
        }
    }

    /// Wait for data from the air
    ///
    /// Copies the received data into `out` and returns its length with the
    /// RSSI the module measured for it.
    pub fn receive_data(
        &mut self,
        out: &mut [u8],
        max_time_s: u8,
    ) -> Result<(usize, i8), Ism7Error<U::Error>> {
        let packet = self.wait_for_event(cmd::DATAEX_IND, max_time_s)?;
        match Event::from_packet(packet)? {
            Event::DataIndication { data, rssi } => {
                let dest = out
                    .get_mut(..data.len())
                    .ok_or(Ism7Error::BufferTooSmall)?;
                dest.copy_from_slice(data);
                Ok((data.len(), rssi))
            }
            _ => Err(Ism7Error::InvalidResponse),
        }
    }
}
