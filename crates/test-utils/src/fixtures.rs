//! Common fixtures for foodmap tests.

/// Category ids used by the default map configuration.
pub mod categories {
    pub const FOOD_PANTRY: i32 = 1;
    pub const MEAL_PROGRAM: i32 = 9;
    /// A category outside the default filter
    pub const SHELTER: i32 = 11;
}

/// Reference coordinates as (latitude, longitude).
pub mod coords {
    pub const SPRINGFIELD_IL: (f64, f64) = (39.8, -89.6);
    pub const LOS_ANGELES: (f64, f64) = (34.0522, -118.2437);
}

/// CSV upload bodies.
pub mod csv {
    /// One row without coordinates, to be geocoded.
    pub const NEEDS_GEOCODING: &str = "\
name,address_1,address_2,city,state,zip,selectedCategoryIds,latitude,longitude
Springfield Pantry,1 Main St,,Springfield,IL,62701,\"1,2\",,
";

    /// One row with coordinates already present.
    pub const HAS_COORDINATES: &str = "\
name,address_1,address_2,city,state,zip,selectedCategoryIds,latitude,longitude
Springfield Pantry,1 Main St,,Springfield,IL,62701,\"1,2\",39.8,-89.6
";

    /// Three rows; the second has no address and no coordinates.
    pub const MIDDLE_ROW_UNRESOLVABLE: &str = "\
name,address_1,address_2,city,state,zip,selectedCategoryIds,latitude,longitude
First,1 Main St,,Springfield,IL,62701,1,,
Nowhere,,,,,,9,,
Third,,,,,,1,34.0522,-118.2437
";

    /// Header cells padded with whitespace.
    pub const PADDED_HEADERS: &str = " name , address_1 ,city,state,zip, selectedCategoryIds ,latitude,longitude
Padded,  200 N Spring St ,Los Angeles,CA,90012,9,34.0537,-118.2428
";
}
