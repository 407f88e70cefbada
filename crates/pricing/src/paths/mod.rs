//! Field-path registries.
//!
//! One module per valuation method; each maps a semantic field and its
//! row/column indices to the literal path used by the form store. Indices
//! are not bounds-checked. The registries deliberately share only the
//! field-name enums below, not a trait: the three table layouts differ.

pub mod comparative;
pub mod direct_comparison;
pub mod sale_grid;
pub mod wqs;

/// Per-comparator calculation cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalcField {
    OfferingPrice,
    OfferingPriceAdjustmentPct,
    OfferingPriceAdjustmentAmt,
    SellingPrice,
    NumberOfYears,
    SellingPriceAdjustmentYear,
    AdjustedValue,
    LandAreaDeficient,
    LandPrice,
    LandDifferenceValue,
    UsableAreaDeficient,
    BuildingPrice,
    BuildingDifferenceValue,
    TotalSecondRevision,
    TotalFactorDiffPercent,
    TotalFactorDiffAmount,
    TotalAdjustValue,
    Weight,
    WeightedAdjustValue,
    TotalScore,
}

impl CalcField {
    pub fn key(self) -> &'static str {
        match self {
            CalcField::OfferingPrice => "offeringPrice",
            CalcField::OfferingPriceAdjustmentPct => "offeringPriceAdjustmentPct",
            CalcField::OfferingPriceAdjustmentAmt => "offeringPriceAdjustmentAmt",
            CalcField::SellingPrice => "sellingPrice",
            CalcField::NumberOfYears => "numberOfYears",
            CalcField::SellingPriceAdjustmentYear => "sellingPriceAdjustmentYear",
            CalcField::AdjustedValue => "adjustedValue",
            CalcField::LandAreaDeficient => "landAreaDeficient",
            CalcField::LandPrice => "landPrice",
            CalcField::LandDifferenceValue => "landDifferenceValue",
            CalcField::UsableAreaDeficient => "usableAreaDeficient",
            CalcField::BuildingPrice => "buildingPrice",
            CalcField::BuildingDifferenceValue => "buildingDifferenceValue",
            CalcField::TotalSecondRevision => "totalSecondRevision",
            CalcField::TotalFactorDiffPercent => "totalFactorDiffPercent",
            CalcField::TotalFactorDiffAmount => "totalFactorDiffAmount",
            CalcField::TotalAdjustValue => "totalAdjustValue",
            CalcField::Weight => "weight",
            CalcField::WeightedAdjustValue => "weightedAdjustValue",
            CalcField::TotalScore => "totalScore",
        }
    }
}

/// Cells of one adjustment-factor row for one comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdjustField {
    Percent,
    Amount,
}

impl AdjustField {
    pub fn key(self) -> &'static str {
        match self {
            AdjustField::Percent => "adjustPercent",
            AdjustField::Amount => "adjustAmount",
        }
    }
}

/// Aggregate cells below the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinalField {
    FinalValue,
    FinalValueRounded,
    CollateralTotalScore,
    Slope,
    Intercept,
}

impl FinalField {
    pub fn key(self) -> &'static str {
        match self {
            FinalField::FinalValue => "finalValue",
            FinalField::FinalValueRounded => "finalValueRounded",
            FinalField::CollateralTotalScore => "collateralTotalScore",
            FinalField::Slope => "slope",
            FinalField::Intercept => "intercept",
        }
    }
}
