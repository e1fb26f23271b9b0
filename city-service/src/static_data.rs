use common::models::Timezone;

/// (city, country, population, zone, latitude, longitude)
type CityRow = (&'static str, &'static str, u64, &'static str, f64, f64);

const CITIES: &[CityRow] = &[
    ("Tokyo", "Japan", 37_400_000, "Asia/Tokyo", 35.6762, 139.6503),
    ("Delhi", "India", 19_000_000, "Asia/Kolkata", 28.7041, 77.1025),
    ("New Delhi", "India", 249_998, "Asia/Kolkata", 28.6139, 77.2090),
    ("Shanghai", "China", 27_058_000, "Asia/Shanghai", 31.2304, 121.4737),
    ("Beijing", "China", 20_463_000, "Asia/Shanghai", 39.9042, 116.4074),
    ("Sao Paulo", "Brazil", 12_325_000, "America/Sao_Paulo", -23.5505, -46.6333),
    ("Rio de Janeiro", "Brazil", 6_748_000, "America/Sao_Paulo", -22.9068, -43.1729),
    ("Mexico City", "Mexico", 9_209_000, "America/Mexico_City", 19.4326, -99.1332),
    ("Cairo", "Egypt", 9_540_000, "Africa/Cairo", 30.0444, 31.2357),
    ("Mumbai", "India", 12_442_000, "Asia/Kolkata", 19.0760, 72.8777),
    ("Kathmandu", "Nepal", 1_442_000, "Asia/Kathmandu", 27.7172, 85.3240),
    ("Dhaka", "Bangladesh", 8_906_000, "Asia/Dhaka", 23.8103, 90.4125),
    ("Osaka", "Japan", 2_725_000, "Asia/Tokyo", 34.6937, 135.5023),
    ("New York", "United States", 8_336_000, "America/New_York", 40.7128, -74.0060),
    ("Los Angeles", "United States", 3_898_000, "America/Los_Angeles", 34.0522, -118.2437),
    ("Chicago", "United States", 2_746_000, "America/Chicago", 41.8781, -87.6298),
    ("Denver", "United States", 715_000, "America/Denver", 39.7392, -104.9903),
    ("Honolulu", "United States", 350_000, "Pacific/Honolulu", 21.3069, -157.8583),
    ("Anchorage", "United States", 291_000, "America/Anchorage", 61.2181, -149.9003),
    ("Toronto", "Canada", 2_794_000, "America/Toronto", 43.6532, -79.3832),
    ("Vancouver", "Canada", 662_000, "America/Vancouver", 49.2827, -123.1207),
    ("St. John's", "Canada", 110_000, "America/St_Johns", 47.5615, -52.7126),
    ("Buenos Aires", "Argentina", 3_075_000, "America/Argentina/Buenos_Aires", -34.6037, -58.3816),
    ("Santiago", "Chile", 6_257_000, "America/Santiago", -33.4489, -70.6693),
    ("Bogota", "Colombia", 7_412_000, "America/Bogota", 4.7110, -74.0721),
    ("Lima", "Peru", 9_751_000, "America/Lima", -12.0464, -77.0428),
    ("London", "United Kingdom", 8_982_000, "Europe/London", 51.5074, -0.1278),
    ("Paris", "France", 2_161_000, "Europe/Paris", 48.8566, 2.3522),
    ("Berlin", "Germany", 3_645_000, "Europe/Berlin", 52.5200, 13.4050),
    ("Madrid", "Spain", 3_223_000, "Europe/Madrid", 40.4168, -3.7038),
    ("Rome", "Italy", 2_873_000, "Europe/Rome", 41.9028, 12.4964),
    ("Moscow", "Russia", 12_506_000, "Europe/Moscow", 55.7558, 37.6173),
    ("Istanbul", "Turkey", 15_462_000, "Europe/Istanbul", 41.0082, 28.9784),
    ("Lagos", "Nigeria", 14_862_000, "Africa/Lagos", 6.5244, 3.3792),
    ("Nairobi", "Kenya", 4_397_000, "Africa/Nairobi", -1.2921, 36.8219),
    ("Addis Ababa", "Ethiopia", 3_384_000, "Africa/Addis_Ababa", 8.9806, 38.7578),
    ("Johannesburg", "South Africa", 5_635_000, "Africa/Johannesburg", -26.2041, 28.0473),
    ("Dubai", "United Arab Emirates", 3_331_000, "Asia/Dubai", 25.2048, 55.2708),
    ("Tehran", "Iran", 8_694_000, "Asia/Tehran", 35.6892, 51.3890),
    ("Singapore", "Singapore", 5_686_000, "Asia/Singapore", 1.3521, 103.8198),
    ("Hong Kong", "China", 7_482_000, "Asia/Hong_Kong", 22.3193, 114.1694),
    ("Seoul", "South Korea", 9_776_000, "Asia/Seoul", 37.5665, 126.9780),
    ("Jakarta", "Indonesia", 10_562_000, "Asia/Jakarta", -6.2088, 106.8456),
    ("Manila", "Philippines", 1_846_000, "Asia/Manila", 14.5995, 120.9842),
    ("Sydney", "Australia", 5_312_000, "Australia/Sydney", -33.8688, 151.2093),
    ("Adelaide", "Australia", 1_376_000, "Australia/Adelaide", -34.9285, 138.6007),
    ("Perth", "Australia", 2_085_000, "Australia/Perth", -31.9505, 115.8605),
    ("Auckland", "New Zealand", 1_657_000, "Pacific/Auckland", -36.8485, 174.7633),
    ("Reykjavik", "Iceland", 131_000, "Atlantic/Reykjavik", 64.1466, -21.9426),
];

/// Bundled reference cities, read once at startup
pub fn static_cities() -> Vec<Timezone> {
    CITIES
        .iter()
        .map(|&(city, country, population, zone, latitude, longitude)| {
            Timezone::new(zone, city, country)
                .with_population(population)
                .with_coordinates(latitude, longitude)
        })
        .collect()
}
