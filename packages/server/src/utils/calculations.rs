//! Electrical unit conversions and Ohm's-law helpers.
//!
//! Pure functions over `f64`: no state, no side effects. The power-family
//! functions take an optional power factor; when it is `None` the load is
//! treated as purely resistive.

/// Horsepower per kilowatt.
pub const HP_PER_KILOWATT: f64 = 1.34102;
/// Watts per mechanical horsepower.
pub const WATTS_PER_HORSEPOWER: f64 = 745.7;
/// √3, line-to-line factor for three-phase power.
pub const THREE_PHASE_FACTOR: f64 = 1.732;

// Power / current conversions

pub fn amperage_to_wattage(amps: f64, volts: f64, pf: Option<f64>) -> f64 {
    match pf {
        Some(pf) => amps * volts * pf,
        None => amps * volts,
    }
}

pub fn wattage_to_amperage(watts: f64, volts: f64, pf: Option<f64>) -> f64 {
    match pf {
        Some(pf) => watts / (volts * pf),
        None => watts / volts,
    }
}

pub fn wattage_to_kilowatt(watts: f64) -> f64 {
    watts / 1000.0
}

pub fn kilowatt_to_wattage(kilowatts: f64) -> f64 {
    kilowatts * 1000.0
}

pub fn kilowatt_to_amperage(kilowatts: f64, volts: f64, pf: Option<f64>) -> f64 {
    wattage_to_amperage(kilowatt_to_wattage(kilowatts), volts, pf)
}

pub fn amperage_to_kilowatt(amps: f64, volts: f64, pf: Option<f64>) -> f64 {
    wattage_to_kilowatt(amperage_to_wattage(amps, volts, pf))
}

pub fn kilowatt_to_horsepower(kilowatts: f64) -> f64 {
    kilowatts * HP_PER_KILOWATT
}

pub fn horsepower_to_kilowatt(horsepower: f64) -> f64 {
    horsepower / HP_PER_KILOWATT
}

pub fn horsepower_to_wattage(horsepower: f64) -> f64 {
    horsepower * WATTS_PER_HORSEPOWER
}

pub fn wattage_to_horsepower(watts: f64) -> f64 {
    watts / WATTS_PER_HORSEPOWER
}

// SI current scaling

/// SI current units in 1000x steps down from the ampere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentUnit {
    Ampere,
    Milliampere,
    Microampere,
    Nanoampere,
    Picoampere,
    Femtoampere,
    Attoampere,
    Zeptoampere,
    Yoctoampere,
}

impl CurrentUnit {
    /// How many of this unit make up one ampere.
    fn per_ampere(self) -> f64 {
        match self {
            CurrentUnit::Ampere => 1.0,
            CurrentUnit::Milliampere => 1e3,
            CurrentUnit::Microampere => 1e6,
            CurrentUnit::Nanoampere => 1e9,
            CurrentUnit::Picoampere => 1e12,
            CurrentUnit::Femtoampere => 1e15,
            CurrentUnit::Attoampere => 1e18,
            CurrentUnit::Zeptoampere => 1e21,
            CurrentUnit::Yoctoampere => 1e24,
        }
    }
}

/// Scale a current value between SI units.
pub fn convert_current(value: f64, from: CurrentUnit, to: CurrentUnit) -> f64 {
    value / from.per_ampere() * to.per_ampere()
}

// Ohm's law

pub fn resistance_to_voltage(resistance: f64, current: f64) -> f64 {
    resistance * current
}

pub fn voltage_to_resistance(voltage: f64, current: f64) -> f64 {
    voltage / current
}

// Power factor

/// Ratio of real to apparent power; 0.0 when there is no apparent power.
pub fn power_factor(real_power: f64, apparent_power: f64) -> f64 {
    if apparent_power != 0.0 {
        real_power / apparent_power
    } else {
        0.0
    }
}

pub fn apparent_power(real_power: f64, power_factor: f64) -> f64 {
    if power_factor != 0.0 {
        real_power / power_factor
    } else {
        0.0
    }
}

pub fn real_power(apparent_power: f64, power_factor: f64) -> f64 {
    if power_factor != 0.0 {
        apparent_power * power_factor
    } else {
        0.0
    }
}

/// Reactive power from the power triangle; 0.0 when apparent <= real.
pub fn reactive_power(real_power: f64, apparent_power: f64) -> f64 {
    if apparent_power > real_power {
        (apparent_power.powi(2) - real_power.powi(2)).sqrt()
    } else {
        0.0
    }
}

/// Power factor angle in degrees; 0.0 outside the [-1, 1] domain.
pub fn power_factor_angle(power_factor: f64) -> f64 {
    if (-1.0..=1.0).contains(&power_factor) {
        power_factor.acos().to_degrees()
    } else {
        0.0
    }
}

/// Power factor angle in radians; 0.0 outside the [-1, 1] domain.
pub fn power_factor_angle_radians(power_factor: f64) -> f64 {
    if (-1.0..=1.0).contains(&power_factor) {
        power_factor.acos()
    } else {
        0.0
    }
}

// Motor calculations

pub fn motor_efficiency(rated_power: f64, input_power: f64) -> f64 {
    if input_power != 0.0 {
        rated_power / input_power
    } else {
        0.0
    }
}

pub fn motor_efficiency_percentage(rated_power: f64, input_power: f64) -> f64 {
    motor_efficiency(rated_power, input_power) * 100.0
}

pub fn motor_power_factor(rated_power: f64, input_power: f64) -> f64 {
    if input_power != 0.0 {
        rated_power / input_power
    } else {
        0.0
    }
}

pub fn motor_power_watts_single_phase(current: f64, voltage: f64, power_factor: f64) -> f64 {
    if voltage != 0.0 {
        current * voltage * power_factor
    } else {
        0.0
    }
}

pub fn motor_power_watts_three_phase(current: f64, voltage: f64, power_factor: f64) -> f64 {
    if voltage != 0.0 {
        current * voltage * power_factor * THREE_PHASE_FACTOR
    } else {
        0.0
    }
}
