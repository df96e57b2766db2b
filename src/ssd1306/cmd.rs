/// SSD1306 command opcodes
pub struct Cmd;
#[allow(dead_code)]
impl Cmd {
    // Fundamental
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
    pub const DISPLAY_ALL_ON: u8 = 0xA5;
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    pub const INVERT_DISPLAY: u8 = 0xA7;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;

    // Addressing
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const MEMORY_MODE: u8 = 0x20;
    pub const COLUMN_ADDR: u8 = 0x21;
    pub const PAGE_ADDR: u8 = 0x22;

    // Hardware configuration
    pub const SET_START_LINE: u8 = 0x40;
    pub const SEG_REMAP: u8 = 0xA0;
    pub const SET_MULTIPLEX: u8 = 0xA8;
    pub const COM_SCAN_INC: u8 = 0xC0;
    pub const COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;

    // Timing and driving
    pub const SET_DISPLAY_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const CHARGE_PUMP: u8 = 0x8D;
}

/// Control bytes that prefix every I2C transaction
pub struct Control;
impl Control {
    /// Next byte is a command
    pub const COMMAND: u8 = 0x00;
    /// Remaining bytes go to display RAM
    pub const DATA: u8 = 0x40;
}

/*
Adafruit SSD1306 begin() sends, in order:
0xAE - Display off
0xD5 - Clock divide ratio / oscillator frequency
0xA8 - Multiplex ratio
0xD3 - Display offset
0x40 - Start line
0x8D - Charge pump
0x20 - Memory addressing mode
0xA1 - Segment remap (column 127 mapped to SEG0)
0xC8 - COM output scan direction (remapped)
0xDA - COM pins hardware configuration
0x81 - Contrast
0xD9 - Pre-charge period
0xDB - VCOMH deselect level
0xA4 - Resume to RAM content
0xA6 - Normal display
0xAF - Display on
*/
