//! Driver for a 10-segment bi-color LED bargraph behind three daisy-chained SN74HC595 shift
//! registers (MikroE BarGraph 2 click).
//!
//! The hardware is write-only: the driver keeps the last pattern it shifted out as the only
//! record of what is displayed. Animations block for their full duration, holding each step with
//! the `DelayMs` provider given at construction.

use hal::blocking::delay::DelayMs;
use log::{debug, trace};

pub mod interface;
pub mod segments;

use self::interface::ShiftRegisterInterface;
pub use self::segments::{level_pattern, segment, Color, ColorBands, Segments, LED_COUNT};

/// Length of the master-reset pulse, in milliseconds.
pub const RESET_PULSE_MS: u32 = 20;

/// LED indices from `start` to `end` inclusive, counting down when `end < start`.
#[derive(Clone, Debug)]
pub struct Sweep {
    next: Option<u8>,
    end: u8,
}

impl Sweep {
    pub fn new(start: u8, end: u8) -> Self {
        Self {
            next: Some(start),
            end,
        }
    }
}

impl Iterator for Sweep {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let current = self.next?;
        self.next = if current < self.end {
            Some(current + 1)
        } else if current > self.end {
            Some(current - 1)
        } else {
            None
        };
        Some(current)
    }
}

/// The bargraph device.
pub struct BarGraph<EI, D> {
    iface: EI,
    delay: D,
    state: Segments,
}

impl<EI, D> BarGraph<EI, D>
where
    EI: ShiftRegisterInterface,
    D: DelayMs<u32>,
{
    /// Create a new `BarGraph` owning the shift register transport and a delay provider. No bus
    /// traffic happens until the first call.
    pub fn new(iface: EI, delay: D) -> Self {
        Self {
            iface,
            delay,
            state: Segments::OFF,
        }
    }

    /// Release the transport and delay provider.
    pub fn release(self) -> (EI, D) {
        (self.iface, self.delay)
    }

    /// The pattern most recently shifted out.
    pub fn state(&self) -> Segments {
        self.state
    }

    /// Pulse the master-reset line of the chain.
    pub fn reset(&mut self) -> Result<(), EI::Error> {
        debug!("bargraph: master reset");
        self.iface.set_master_reset(true)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.iface.set_master_reset(false)
    }

    /// Switch power to the LEDs on or off.
    pub fn power(&mut self, on: bool) -> Result<(), EI::Error> {
        debug!("bargraph: power {}", if on { "on" } else { "off" });
        self.iface.set_output_enable(on)
    }

    /// Shift a full pattern into the chain, high register first.
    pub fn segment_switch(&mut self, segments: Segments) -> Result<(), EI::Error> {
        trace!(
            "bargraph: {:#04x} {:#04x} {:#04x}",
            segments.high,
            segments.mid,
            segments.low
        );
        for byte in segments.bytes().iter() {
            self.iface.write_byte(*byte)?;
        }
        self.state = segments;
        Ok(())
    }

    /// Turn every LED off.
    pub fn lights_off(&mut self) -> Result<(), EI::Error> {
        self.segment_switch(Segments::OFF)
    }

    /// Light the single LED at `index` (1-based) in `color`. An index outside `1..=LED_COUNT`
    /// turns every LED off.
    pub fn led_color(&mut self, index: u8, color: Color) -> Result<(), EI::Error> {
        self.segment_switch(segment(index, color))
    }

    pub fn led_green(&mut self, index: u8) -> Result<(), EI::Error> {
        self.led_color(index, Color::Green)
    }

    pub fn led_yellow(&mut self, index: u8) -> Result<(), EI::Error> {
        self.led_color(index, Color::Yellow)
    }

    pub fn led_red(&mut self, index: u8) -> Result<(), EI::Error> {
        self.led_color(index, Color::Red)
    }

    /// Run a single lit LED from `start` to `end` (or backwards when `end < start`), holding each
    /// position for `hold_ms`. All LEDs are off afterwards.
    pub fn led_range(
        &mut self,
        start: u8,
        end: u8,
        color: Color,
        hold_ms: u32,
    ) -> Result<(), EI::Error> {
        debug!("bargraph: sweep {} {}..={}", color.name(), start, end);
        for index in Sweep::new(start, end) {
            self.led_color(index, color)?;
            self.delay.delay_ms(hold_ms);
        }
        self.lights_off()
    }

    /// Fill the bargraph from `start` to `end` (or backwards), each LED staying lit once reached
    /// and each step held for `hold_ms`. Positions outside `1..=LED_COUNT` are skipped. The
    /// filled pattern is left on the display.
    pub fn led_range_all(
        &mut self,
        start: u8,
        end: u8,
        color: Color,
        hold_ms: u32,
    ) -> Result<(), EI::Error> {
        debug!("bargraph: fill {} {}..={}", color.name(), start, end);
        let mut lit = Segments::OFF;
        for index in Sweep::new(start, end).filter(|&i| segments::in_range(i)) {
            lit |= segment(index, color);
            self.segment_switch(lit)?;
            self.delay.delay_ms(hold_ms);
        }
        self.segment_switch(lit)
    }

    /// Show `level` as a bar from LED 1, colored by `bands`. A level outside `1..=LED_COUNT`
    /// turns every LED off.
    pub fn level_graph(&mut self, level: u8, bands: ColorBands) -> Result<(), EI::Error> {
        self.segment_switch(level_pattern(level, bands))
    }
}

#[cfg(test)]
mod tests {
    use super::interface::test_spy::{Event, TestBusError, TestDelay, TestSpyInterface};
    use super::*;

    fn bargraph(ei: &TestSpyInterface) -> BarGraph<TestSpyInterface, TestDelay> {
        BarGraph::new(ei.split(), ei.delay())
    }

    #[test]
    fn sweep_ascending() {
        assert_eq!(Sweep::new(1, 4).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn sweep_descending() {
        assert_eq!(Sweep::new(10, 7).collect::<Vec<_>>(), vec![10, 9, 8, 7]);
    }

    #[test]
    fn sweep_single() {
        assert_eq!(Sweep::new(5, 5).collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn sweep_extremes() {
        assert_eq!(Sweep::new(254, 255).collect::<Vec<_>>(), vec![254, 255]);
        assert_eq!(Sweep::new(1, 0).collect::<Vec<_>>(), vec![1, 0]);
    }

    #[test]
    fn segment_switch_order_and_state() {
        let ei = TestSpyInterface::new();
        let mut bg = bargraph(&ei);
        assert!(bg.segment_switch(Segments::new(0x01, 0x02, 0x03)).is_ok());
        assert_eq!(ei.bytes(), vec![0x01, 0x02, 0x03]);
        assert_eq!(bg.state(), Segments::new(0x01, 0x02, 0x03));
    }

    #[test]
    fn reset_pulses_master_reset() {
        let ei = TestSpyInterface::new();
        let mut bg = bargraph(&ei);
        assert!(bg.reset().is_ok());
        assert_eq!(
            ei.events(),
            vec![
                Event::Reset(true),
                Event::Delay(RESET_PULSE_MS),
                Event::Reset(false)
            ]
        );
    }

    #[test]
    fn power_drives_enable() {
        let ei = TestSpyInterface::new();
        let mut bg = bargraph(&ei);
        assert!(bg.power(true).is_ok());
        assert!(bg.power(false).is_ok());
        assert_eq!(ei.events(), vec![Event::Enable(true), Event::Enable(false)]);
    }

    #[test]
    fn led_color_shorthands() {
        let ei = TestSpyInterface::new();
        let mut bg = bargraph(&ei);
        assert!(bg.led_green(3).is_ok());
        assert!(bg.led_yellow(3).is_ok());
        assert!(bg.led_red(3).is_ok());
        assert_eq!(
            ei.frames(),
            vec![
                segment(3, Color::Green),
                segment(3, Color::Yellow),
                segment(3, Color::Red)
            ]
        );
    }

    #[test]
    fn led_color_out_of_range_turns_off() {
        let ei = TestSpyInterface::new();
        let mut bg = bargraph(&ei);
        assert!(bg.led_red(4).is_ok());
        assert!(bg.led_red(0).is_ok());
        assert_eq!(bg.state(), Segments::OFF);
        assert!(bg.led_red(11).is_ok());
        assert_eq!(
            ei.frames(),
            vec![segment(4, Color::Red), Segments::OFF, Segments::OFF]
        );
    }

    #[test]
    fn led_range_descending_is_exclusive_and_ends_off() {
        let ei = TestSpyInterface::new();
        let mut bg = bargraph(&ei);
        assert!(bg.led_range(10, 1, Color::Yellow, 50).is_ok());

        let steps = ei.steps();
        assert_eq!(steps.len(), 11);
        let expected = (1..=10u8)
            .rev()
            .map(|i| (segment(i, Color::Yellow), Some(50)))
            .chain(Some((Segments::OFF, None)))
            .collect::<Vec<_>>();
        assert_eq!(steps, expected);
        assert_eq!(bg.state(), Segments::OFF);
    }

    #[test]
    fn led_range_out_of_range_steps_are_dark() {
        let ei = TestSpyInterface::new();
        let mut bg = bargraph(&ei);
        assert!(bg.led_range(0, 2, Color::Green, 5).is_ok());
        assert_eq!(
            ei.frames(),
            vec![
                Segments::OFF,
                segment(1, Color::Green),
                segment(2, Color::Green),
                Segments::OFF
            ]
        );
    }

    #[test]
    fn led_range_all_accumulates() {
        let ei = TestSpyInterface::new();
        let mut bg = bargraph(&ei);
        assert!(bg.led_range_all(1, 10, Color::Red, 20).is_ok());

        let frames = ei.frames();
        assert_eq!(frames.len(), 11);
        for (n, frame) in frames.iter().take(10).enumerate() {
            assert_eq!(frame.count_ones(), n as u32 + 1);
        }
        let all_red = (1..=10).fold(Segments::OFF, |acc, i| acc | segment(i, Color::Red));
        assert_eq!(frames[10], all_red);
        assert_eq!(bg.state(), all_red);
    }

    #[test]
    fn led_range_all_descending_partial() {
        let ei = TestSpyInterface::new();
        let mut bg = bargraph(&ei);
        assert!(bg.led_range_all(12, 9, Color::Green, 1).is_ok());

        let nine_ten = segment(9, Color::Green) | segment(10, Color::Green);
        assert_eq!(
            ei.steps(),
            vec![
                (segment(10, Color::Green), Some(1)),
                (nine_ten, Some(1)),
                (nine_ten, None)
            ]
        );
    }

    #[test]
    fn led_range_all_nothing_in_range() {
        let ei = TestSpyInterface::new();
        let mut bg = bargraph(&ei);
        assert!(bg.led_range_all(11, 20, Color::Green, 1).is_ok());
        assert_eq!(ei.steps(), vec![(Segments::OFF, None)]);
    }

    #[test]
    fn level_graph_partitions() {
        let ei = TestSpyInterface::new();
        let mut bg = bargraph(&ei);
        assert!(bg.level_graph(5, ColorBands::new(4, 3, 3)).is_ok());
        let expected = segment(1, Color::Green)
            | segment(2, Color::Green)
            | segment(3, Color::Green)
            | segment(4, Color::Green)
            | segment(5, Color::Yellow);
        assert_eq!(ei.frames(), vec![expected]);
    }

    #[test]
    fn level_graph_out_of_range() {
        let ei = TestSpyInterface::new();
        let mut bg = bargraph(&ei);
        assert!(bg.level_graph(3, ColorBands::default()).is_ok());
        assert!(bg.level_graph(0, ColorBands::default()).is_ok());
        assert_eq!(bg.state(), Segments::OFF);
        assert!(bg.level_graph(11, ColorBands::default()).is_ok());
        assert_eq!(bg.state(), Segments::OFF);
    }

    #[test]
    fn write_error_propagates_and_keeps_state() {
        let ei = TestSpyInterface::new();
        let mut bg = bargraph(&ei);
        assert!(bg.led_green(1).is_ok());
        ei.fail_after(1);
        assert_eq!(bg.led_green(2), Err(TestBusError));
        assert_eq!(bg.state(), segment(1, Color::Green));
    }

    #[test]
    fn write_error_stops_animation() {
        let ei = TestSpyInterface::new();
        let mut bg = bargraph(&ei);
        ei.fail_after(6);
        assert_eq!(bg.led_range(1, 10, Color::Green, 1), Err(TestBusError));
        assert_eq!(ei.frames().len(), 2);
    }
}
