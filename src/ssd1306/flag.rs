/// Argument values for the SSD1306 commands in [`crate::ssd1306::cmd::Cmd`].
///
/// Defaults are the values used for the 128x64 modules wired with the
/// internal charge pump.
pub struct Flag;
#[allow(missing_docs)]
#[allow(dead_code)]
impl Flag {
    // Display clock divide ratio (0xD5): divide by 1, oscillator frequency 8
    pub const CLOCK_DIV_DEFAULT: u8 = 0x80;

    // Display offset (0xD3)
    pub const DISPLAY_OFFSET_NONE: u8 = 0x00;

    // Start line (0x40 | line)
    pub const START_LINE_ZERO: u8 = 0x00;

    // Charge pump (0x8D)
    pub const CHARGE_PUMP_ENABLE: u8 = 0x14;
    pub const CHARGE_PUMP_DISABLE: u8 = 0x10;

    // Memory addressing mode (0x20)
    pub const MEMORY_MODE_HORIZONTAL: u8 = 0x00; // column increments, wraps to the next page
    pub const MEMORY_MODE_VERTICAL: u8 = 0x01;
    pub const MEMORY_MODE_PAGE: u8 = 0x02;

    // Segment remap (0xA0 | bit)
    pub const SEG_REMAP_REVERSED: u8 = 0x01;

    // COM pins hardware configuration (0xDA)
    pub const COM_PINS_ALTERNATIVE: u8 = 0x12; // 64 row panels
    pub const COM_PINS_SEQUENTIAL: u8 = 0x02; // 16 and 32 row panels

    // Contrast (0x81)
    pub const CONTRAST_DEFAULT: u8 = 0xCF;

    // Pre-charge period (0xD9): phase 1 = 1 DCLK, phase 2 = 15 DCLK
    pub const PRECHARGE_DEFAULT: u8 = 0xF1;

    // VCOMH deselect level (0xDB): ~0.77 x Vcc
    pub const VCOM_DESELECT_DEFAULT: u8 = 0x40;
}
