//! The region reference store: built-in seed dataset plus optional
//! JSON override at ~/.rokto/regions.json.
//!
//! All lookups are linear scans. The hierarchy is small (a few hundred
//! rows) and immutable for the life of the process, so nothing fancier
//! is warranted.

use super::types::{District, Division, RegionError, RegionId, Upazila};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

// ─── Built-in seed dataset ──────────────────────────────────────

struct SeedDivision {
    id: RegionId,
    name: &'static str,
}

struct SeedDistrict {
    id: RegionId,
    name: &'static str,
    division: RegionId,
}

struct SeedUpazila {
    id: RegionId,
    name: &'static str,
    district: RegionId,
    coords: Option<(f64, f64)>,
}

const SEED_DIVISIONS: &[SeedDivision] = &[
    SeedDivision { id: 1, name: "Barishal" },
    SeedDivision { id: 2, name: "Chattogram" },
    SeedDivision { id: 3, name: "Dhaka" },
    SeedDivision { id: 4, name: "Khulna" },
    SeedDivision { id: 5, name: "Mymensingh" },
    SeedDivision { id: 6, name: "Rajshahi" },
    SeedDivision { id: 7, name: "Rangpur" },
    SeedDivision { id: 8, name: "Sylhet" },
];

const SEED_DISTRICTS: &[SeedDistrict] = &[
    SeedDistrict { id: 1, name: "Barguna", division: 1 },
    SeedDistrict { id: 2, name: "Barishal", division: 1 },
    SeedDistrict { id: 3, name: "Bhola", division: 1 },
    SeedDistrict { id: 4, name: "Jhalokati", division: 1 },
    SeedDistrict { id: 5, name: "Patuakhali", division: 1 },
    SeedDistrict { id: 6, name: "Pirojpur", division: 1 },
    SeedDistrict { id: 7, name: "Bandarban", division: 2 },
    SeedDistrict { id: 8, name: "Brahmanbaria", division: 2 },
    SeedDistrict { id: 9, name: "Chandpur", division: 2 },
    SeedDistrict { id: 10, name: "Chattogram", division: 2 },
    SeedDistrict { id: 11, name: "Cox's Bazar", division: 2 },
    SeedDistrict { id: 12, name: "Cumilla", division: 2 },
    SeedDistrict { id: 13, name: "Feni", division: 2 },
    SeedDistrict { id: 14, name: "Khagrachhari", division: 2 },
    SeedDistrict { id: 15, name: "Lakshmipur", division: 2 },
    SeedDistrict { id: 16, name: "Noakhali", division: 2 },
    SeedDistrict { id: 17, name: "Rangamati", division: 2 },
    SeedDistrict { id: 18, name: "Dhaka", division: 3 },
    SeedDistrict { id: 19, name: "Faridpur", division: 3 },
    SeedDistrict { id: 20, name: "Gazipur", division: 3 },
    SeedDistrict { id: 21, name: "Gopalganj", division: 3 },
    SeedDistrict { id: 22, name: "Kishoreganj", division: 3 },
    SeedDistrict { id: 23, name: "Madaripur", division: 3 },
    SeedDistrict { id: 24, name: "Manikganj", division: 3 },
    SeedDistrict { id: 25, name: "Munshiganj", division: 3 },
    SeedDistrict { id: 26, name: "Narayanganj", division: 3 },
    SeedDistrict { id: 27, name: "Narsingdi", division: 3 },
    SeedDistrict { id: 28, name: "Rajbari", division: 3 },
    SeedDistrict { id: 29, name: "Shariatpur", division: 3 },
    SeedDistrict { id: 30, name: "Tangail", division: 3 },
    SeedDistrict { id: 31, name: "Bagerhat", division: 4 },
    SeedDistrict { id: 32, name: "Chuadanga", division: 4 },
    SeedDistrict { id: 33, name: "Jashore", division: 4 },
    SeedDistrict { id: 34, name: "Jhenaidah", division: 4 },
    SeedDistrict { id: 35, name: "Khulna", division: 4 },
    SeedDistrict { id: 36, name: "Kushtia", division: 4 },
    SeedDistrict { id: 37, name: "Magura", division: 4 },
    SeedDistrict { id: 38, name: "Meherpur", division: 4 },
    SeedDistrict { id: 39, name: "Narail", division: 4 },
    SeedDistrict { id: 40, name: "Satkhira", division: 4 },
    SeedDistrict { id: 41, name: "Jamalpur", division: 5 },
    SeedDistrict { id: 42, name: "Mymensingh", division: 5 },
    SeedDistrict { id: 43, name: "Netrokona", division: 5 },
    SeedDistrict { id: 44, name: "Sherpur", division: 5 },
    SeedDistrict { id: 45, name: "Bogura", division: 6 },
    SeedDistrict { id: 46, name: "Chapainawabganj", division: 6 },
    SeedDistrict { id: 47, name: "Joypurhat", division: 6 },
    SeedDistrict { id: 48, name: "Naogaon", division: 6 },
    SeedDistrict { id: 49, name: "Natore", division: 6 },
    SeedDistrict { id: 50, name: "Pabna", division: 6 },
    SeedDistrict { id: 51, name: "Rajshahi", division: 6 },
    SeedDistrict { id: 52, name: "Sirajganj", division: 6 },
    SeedDistrict { id: 53, name: "Dinajpur", division: 7 },
    SeedDistrict { id: 54, name: "Gaibandha", division: 7 },
    SeedDistrict { id: 55, name: "Kurigram", division: 7 },
    SeedDistrict { id: 56, name: "Lalmonirhat", division: 7 },
    SeedDistrict { id: 57, name: "Nilphamari", division: 7 },
    SeedDistrict { id: 58, name: "Panchagarh", division: 7 },
    SeedDistrict { id: 59, name: "Rangpur", division: 7 },
    SeedDistrict { id: 60, name: "Thakurgaon", division: 7 },
    SeedDistrict { id: 61, name: "Habiganj", division: 8 },
    SeedDistrict { id: 62, name: "Moulvibazar", division: 8 },
    SeedDistrict { id: 63, name: "Sunamganj", division: 8 },
    SeedDistrict { id: 64, name: "Sylhet", division: 8 },
];

// Sadar entries sit at the district town; a handful of remote upazilas
// have no coordinates in the source data and are kept name-only.
const SEED_UPAZILAS: &[SeedUpazila] = &[
    SeedUpazila { id: 1, name: "Barguna Sadar", district: 1, coords: Some((22.1590, 90.1266)) },
    SeedUpazila { id: 2, name: "Amtali", district: 1, coords: Some((22.1375, 90.2238)) },
    SeedUpazila { id: 3, name: "Barishal Sadar", district: 2, coords: Some((22.7010, 90.3535)) },
    SeedUpazila { id: 4, name: "Bakerganj", district: 2, coords: Some((22.5454, 90.3324)) },
    SeedUpazila { id: 5, name: "Bhola Sadar", district: 3, coords: Some((22.6859, 90.6482)) },
    SeedUpazila { id: 6, name: "Char Fasson", district: 3, coords: Some((22.1864, 90.7651)) },
    SeedUpazila { id: 7, name: "Jhalokati Sadar", district: 4, coords: Some((22.6406, 90.1987)) },
    SeedUpazila { id: 8, name: "Patuakhali Sadar", district: 5, coords: Some((22.3596, 90.3298)) },
    SeedUpazila { id: 9, name: "Kalapara", district: 5, coords: Some((21.9821, 90.2242)) },
    SeedUpazila { id: 10, name: "Pirojpur Sadar", district: 6, coords: Some((22.5841, 89.9720)) },
    SeedUpazila { id: 11, name: "Mathbaria", district: 6, coords: Some((22.2921, 89.9580)) },
    SeedUpazila { id: 12, name: "Bandarban Sadar", district: 7, coords: Some((22.1953, 92.2184)) },
    SeedUpazila { id: 13, name: "Rowangchhari", district: 7, coords: None },
    SeedUpazila { id: 14, name: "Brahmanbaria Sadar", district: 8, coords: Some((23.9571, 91.1119)) },
    SeedUpazila { id: 15, name: "Ashuganj", district: 8, coords: Some((24.0386, 90.9862)) },
    SeedUpazila { id: 16, name: "Chandpur Sadar", district: 9, coords: Some((23.2333, 90.6712)) },
    SeedUpazila { id: 17, name: "Hajiganj", district: 9, coords: Some((23.2515, 90.8556)) },
    SeedUpazila { id: 18, name: "Sitakunda", district: 10, coords: Some((22.6182, 91.6590)) },
    SeedUpazila { id: 19, name: "Hathazari", district: 10, coords: Some((22.5082, 91.8079)) },
    SeedUpazila { id: 20, name: "Patiya", district: 10, coords: Some((22.2958, 91.9760)) },
    SeedUpazila { id: 21, name: "Anwara", district: 10, coords: Some((22.2039, 91.9121)) },
    SeedUpazila { id: 22, name: "Cox's Bazar Sadar", district: 11, coords: Some((21.4272, 92.0058)) },
    SeedUpazila { id: 23, name: "Chakaria", district: 11, coords: Some((21.7832, 92.0770)) },
    SeedUpazila { id: 24, name: "Teknaf", district: 11, coords: Some((20.8646, 92.2985)) },
    SeedUpazila { id: 25, name: "Ukhiya", district: 11, coords: Some((21.2458, 92.1060)) },
    SeedUpazila { id: 26, name: "Cumilla Sadar", district: 12, coords: Some((23.4607, 91.1809)) },
    SeedUpazila { id: 27, name: "Daudkandi", district: 12, coords: Some((23.5344, 90.7190)) },
    SeedUpazila { id: 28, name: "Laksam", district: 12, coords: Some((23.2401, 91.1212)) },
    SeedUpazila { id: 29, name: "Feni Sadar", district: 13, coords: Some((23.0159, 91.3976)) },
    SeedUpazila { id: 30, name: "Chhagalnaiya", district: 13, coords: Some((23.0321, 91.5122)) },
    SeedUpazila { id: 31, name: "Khagrachhari Sadar", district: 14, coords: Some((23.1193, 91.9847)) },
    SeedUpazila { id: 32, name: "Lakshmipur Sadar", district: 15, coords: Some((22.9447, 90.8282)) },
    SeedUpazila { id: 33, name: "Raipur", district: 15, coords: Some((23.0396, 90.7767)) },
    SeedUpazila { id: 34, name: "Noakhali Sadar", district: 16, coords: Some((22.8696, 91.0995)) },
    SeedUpazila { id: 35, name: "Hatiya", district: 16, coords: Some((22.3670, 91.1016)) },
    SeedUpazila { id: 36, name: "Rangamati Sadar", district: 17, coords: Some((22.6533, 92.1789)) },
    SeedUpazila { id: 37, name: "Belaichhari", district: 17, coords: None },
    SeedUpazila { id: 38, name: "Savar", district: 18, coords: Some((23.8583, 90.2667)) },
    SeedUpazila { id: 39, name: "Dhamrai", district: 18, coords: Some((23.9180, 90.2089)) },
    SeedUpazila { id: 40, name: "Keraniganj", district: 18, coords: Some((23.7014, 90.3625)) },
    SeedUpazila { id: 41, name: "Nawabganj", district: 18, coords: Some((23.6614, 90.1620)) },
    SeedUpazila { id: 42, name: "Dohar", district: 18, coords: Some((23.5880, 90.1396)) },
    SeedUpazila { id: 43, name: "Faridpur Sadar", district: 19, coords: Some((23.6070, 89.8429)) },
    SeedUpazila { id: 44, name: "Bhanga", district: 19, coords: Some((23.3857, 89.9982)) },
    SeedUpazila { id: 45, name: "Gazipur Sadar", district: 20, coords: Some((23.9999, 90.4203)) },
    SeedUpazila { id: 46, name: "Kaliakair", district: 20, coords: Some((24.0684, 90.2168)) },
    SeedUpazila { id: 47, name: "Kapasia", district: 20, coords: Some((24.1100, 90.5640)) },
    SeedUpazila { id: 48, name: "Sreepur", district: 20, coords: Some((24.2011, 90.4843)) },
    SeedUpazila { id: 49, name: "Gopalganj Sadar", district: 21, coords: Some((23.0050, 89.8266)) },
    SeedUpazila { id: 50, name: "Tungipara", district: 21, coords: Some((22.9001, 89.9027)) },
    SeedUpazila { id: 51, name: "Kishoreganj Sadar", district: 22, coords: Some((24.4449, 90.7766)) },
    SeedUpazila { id: 52, name: "Bhairab", district: 22, coords: Some((24.0524, 90.9764)) },
    SeedUpazila { id: 53, name: "Madaripur Sadar", district: 23, coords: Some((23.1641, 90.1897)) },
    SeedUpazila { id: 54, name: "Manikganj Sadar", district: 24, coords: Some((23.8644, 90.0047)) },
    SeedUpazila { id: 55, name: "Singair", district: 24, coords: Some((23.7786, 90.1521)) },
    SeedUpazila { id: 56, name: "Munshiganj Sadar", district: 25, coords: Some((23.5422, 90.5305)) },
    SeedUpazila { id: 57, name: "Sreenagar", district: 25, coords: Some((23.5425, 90.2962)) },
    SeedUpazila { id: 58, name: "Narayanganj Sadar", district: 26, coords: Some((23.6238, 90.5000)) },
    SeedUpazila { id: 59, name: "Rupganj", district: 26, coords: Some((23.7816, 90.5419)) },
    SeedUpazila { id: 60, name: "Sonargaon", district: 26, coords: Some((23.6482, 90.5987)) },
    SeedUpazila { id: 61, name: "Narsingdi Sadar", district: 27, coords: Some((23.9322, 90.7151)) },
    SeedUpazila { id: 62, name: "Palash", district: 27, coords: Some((24.0125, 90.6336)) },
    SeedUpazila { id: 63, name: "Rajbari Sadar", district: 28, coords: Some((23.7574, 89.6445)) },
    SeedUpazila { id: 64, name: "Shariatpur Sadar", district: 29, coords: Some((23.2423, 90.4348)) },
    SeedUpazila { id: 65, name: "Tangail Sadar", district: 30, coords: Some((24.2513, 89.9167)) },
    SeedUpazila { id: 66, name: "Mirzapur", district: 30, coords: Some((24.1022, 90.0934)) },
    SeedUpazila { id: 67, name: "Bagerhat Sadar", district: 31, coords: Some((22.6516, 89.7859)) },
    SeedUpazila { id: 68, name: "Mongla", district: 31, coords: Some((22.4885, 89.6030)) },
    SeedUpazila { id: 69, name: "Chuadanga Sadar", district: 32, coords: Some((23.6402, 88.8410)) },
    SeedUpazila { id: 70, name: "Jashore Sadar", district: 33, coords: Some((23.1664, 89.2081)) },
    SeedUpazila { id: 71, name: "Sharsha", district: 33, coords: Some((23.0333, 89.0000)) },
    SeedUpazila { id: 72, name: "Jhenaidah Sadar", district: 34, coords: Some((23.5450, 89.1726)) },
    SeedUpazila { id: 73, name: "Dumuria", district: 35, coords: Some((22.8083, 89.4258)) },
    SeedUpazila { id: 74, name: "Paikgachha", district: 35, coords: Some((22.5918, 89.3297)) },
    SeedUpazila { id: 75, name: "Rupsha", district: 35, coords: Some((22.7659, 89.6329)) },
    SeedUpazila { id: 76, name: "Dacope", district: 35, coords: Some((22.5726, 89.5113)) },
    SeedUpazila { id: 77, name: "Kushtia Sadar", district: 36, coords: Some((23.9013, 89.1205)) },
    SeedUpazila { id: 78, name: "Bheramara", district: 36, coords: Some((24.0243, 88.9923)) },
    SeedUpazila { id: 79, name: "Magura Sadar", district: 37, coords: Some((23.4855, 89.4198)) },
    SeedUpazila { id: 80, name: "Meherpur Sadar", district: 38, coords: Some((23.7622, 88.6318)) },
    SeedUpazila { id: 81, name: "Narail Sadar", district: 39, coords: Some((23.1163, 89.5840)) },
    SeedUpazila { id: 82, name: "Satkhira Sadar", district: 40, coords: Some((22.7185, 89.0705)) },
    SeedUpazila { id: 83, name: "Shyamnagar", district: 40, coords: Some((22.3327, 89.1027)) },
    SeedUpazila { id: 84, name: "Jamalpur Sadar", district: 41, coords: Some((24.9375, 89.9373)) },
    SeedUpazila { id: 85, name: "Sarishabari", district: 41, coords: Some((24.7474, 89.8354)) },
    SeedUpazila { id: 86, name: "Mymensingh Sadar", district: 42, coords: Some((24.7471, 90.4203)) },
    SeedUpazila { id: 87, name: "Trishal", district: 42, coords: Some((24.5802, 90.3943)) },
    SeedUpazila { id: 88, name: "Bhaluka", district: 42, coords: Some((24.3814, 90.3810)) },
    SeedUpazila { id: 89, name: "Muktagachha", district: 42, coords: Some((24.7649, 90.2569)) },
    SeedUpazila { id: 90, name: "Netrokona Sadar", district: 43, coords: Some((24.8709, 90.7279)) },
    SeedUpazila { id: 91, name: "Khaliajuri", district: 43, coords: None },
    SeedUpazila { id: 92, name: "Sherpur Sadar", district: 44, coords: Some((25.0205, 90.0153)) },
    SeedUpazila { id: 93, name: "Bogura Sadar", district: 45, coords: Some((24.8466, 89.3773)) },
    SeedUpazila { id: 94, name: "Sherpur", district: 45, coords: Some((24.6674, 89.4190)) },
    SeedUpazila { id: 95, name: "Chapainawabganj Sadar", district: 46, coords: Some((24.5965, 88.2776)) },
    SeedUpazila { id: 96, name: "Shibganj", district: 46, coords: Some((24.6900, 88.1650)) },
    SeedUpazila { id: 97, name: "Joypurhat Sadar", district: 47, coords: Some((25.1012, 89.0227)) },
    SeedUpazila { id: 98, name: "Naogaon Sadar", district: 48, coords: Some((24.7936, 88.9318)) },
    SeedUpazila { id: 99, name: "Patnitala", district: 48, coords: Some((25.0570, 88.7392)) },
    SeedUpazila { id: 100, name: "Natore Sadar", district: 49, coords: Some((24.4102, 88.9877)) },
    SeedUpazila { id: 101, name: "Lalpur", district: 49, coords: Some((24.1890, 89.0330)) },
    SeedUpazila { id: 102, name: "Pabna Sadar", district: 50, coords: Some((24.0064, 89.2372)) },
    SeedUpazila { id: 103, name: "Ishwardi", district: 50, coords: Some((24.1326, 89.0771)) },
    SeedUpazila { id: 104, name: "Paba", district: 51, coords: Some((24.4024, 88.6386)) },
    SeedUpazila { id: 105, name: "Godagari", district: 51, coords: Some((24.4686, 88.3318)) },
    SeedUpazila { id: 106, name: "Puthia", district: 51, coords: Some((24.3660, 88.8412)) },
    SeedUpazila { id: 107, name: "Sirajganj Sadar", district: 52, coords: Some((24.4534, 89.7007)) },
    SeedUpazila { id: 108, name: "Shahjadpur", district: 52, coords: Some((24.1766, 89.5890)) },
    SeedUpazila { id: 109, name: "Dinajpur Sadar", district: 53, coords: Some((25.6279, 88.6332)) },
    SeedUpazila { id: 110, name: "Parbatipur", district: 53, coords: Some((25.6608, 88.9327)) },
    SeedUpazila { id: 111, name: "Gaibandha Sadar", district: 54, coords: Some((25.3288, 89.5281)) },
    SeedUpazila { id: 112, name: "Kurigram Sadar", district: 55, coords: Some((25.8054, 89.6362)) },
    SeedUpazila { id: 113, name: "Char Rajibpur", district: 55, coords: None },
    SeedUpazila { id: 114, name: "Lalmonirhat Sadar", district: 56, coords: Some((25.9923, 89.2847)) },
    SeedUpazila { id: 115, name: "Patgram", district: 56, coords: Some((26.3476, 89.0357)) },
    SeedUpazila { id: 116, name: "Nilphamari Sadar", district: 57, coords: Some((25.9317, 88.8563)) },
    SeedUpazila { id: 117, name: "Saidpur", district: 57, coords: Some((25.7771, 88.8918)) },
    SeedUpazila { id: 118, name: "Panchagarh Sadar", district: 58, coords: Some((26.3411, 88.5542)) },
    SeedUpazila { id: 119, name: "Tetulia", district: 58, coords: Some((26.4960, 88.4333)) },
    SeedUpazila { id: 120, name: "Rangpur Sadar", district: 59, coords: Some((25.7439, 89.2752)) },
    SeedUpazila { id: 121, name: "Mithapukur", district: 59, coords: Some((25.5537, 89.2855)) },
    SeedUpazila { id: 122, name: "Badarganj", district: 59, coords: Some((25.6732, 89.0517)) },
    SeedUpazila { id: 123, name: "Thakurgaon Sadar", district: 60, coords: Some((26.0337, 88.4616)) },
    SeedUpazila { id: 124, name: "Habiganj Sadar", district: 61, coords: Some((24.3745, 91.4155)) },
    SeedUpazila { id: 125, name: "Madhabpur", district: 61, coords: Some((24.1060, 91.2846)) },
    SeedUpazila { id: 126, name: "Moulvibazar Sadar", district: 62, coords: Some((24.4829, 91.7774)) },
    SeedUpazila { id: 127, name: "Sreemangal", district: 62, coords: Some((24.3065, 91.7296)) },
    SeedUpazila { id: 128, name: "Sunamganj Sadar", district: 63, coords: Some((25.0658, 91.3950)) },
    SeedUpazila { id: 129, name: "Tahirpur", district: 63, coords: None },
    SeedUpazila { id: 130, name: "Sylhet Sadar", district: 64, coords: Some((24.8949, 91.8687)) },
    SeedUpazila { id: 131, name: "Beanibazar", district: 64, coords: Some((24.8097, 92.1724)) },
    SeedUpazila { id: 132, name: "Golapganj", district: 64, coords: Some((24.8566, 91.9573)) },
];

// ─── Hint normalization ─────────────────────────────────────────

/// Lowercase a hint and drop administrative level words, so that
/// "Dhaka Division" or "Savar, Dhaka" line up with bare seed names.
fn fold_hint(raw: &str) -> String {
    let lowered = raw.to_lowercase().replace(',', " ");
    lowered
        .split_whitespace()
        .filter(|w| !matches!(*w, "division" | "district" | "zila" | "upazila" | "thana"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

// ─── Store ──────────────────────────────────────────────────────

/// Dataset counters for the stats endpoint and the CLI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub divisions: usize,
    pub districts: usize,
    pub upazilas: usize,
    pub with_coords: usize,
}

/// On-disk seed file shape (same field names as the wire models).
#[derive(Deserialize)]
struct SeedFile {
    divisions: Vec<Division>,
    districts: Vec<District>,
    upazilas: Vec<Upazila>,
}

/// The immutable administrative hierarchy.
#[derive(Debug)]
pub struct RegionStore {
    divisions: Vec<Division>,
    districts: Vec<District>,
    upazilas: Vec<Upazila>,
}

impl RegionStore {
    /// Build a store from explicit rows, checking referential
    /// integrity and id uniqueness per level.
    pub fn new(
        divisions: Vec<Division>,
        districts: Vec<District>,
        upazilas: Vec<Upazila>,
    ) -> Result<Self, RegionError> {
        let store = Self { divisions, districts, upazilas };
        store.validate()?;
        Ok(store)
    }

    /// The dataset compiled into the binary.
    pub fn builtin() -> Self {
        let divisions = SEED_DIVISIONS
            .iter()
            .map(|d| Division { id: d.id, name: d.name.to_string() })
            .collect();
        let districts = SEED_DISTRICTS
            .iter()
            .map(|d| District { id: d.id, name: d.name.to_string(), division_id: d.division })
            .collect();
        let upazilas = SEED_UPAZILAS
            .iter()
            .map(|u| Upazila {
                id: u.id,
                name: u.name.to_string(),
                district_id: u.district,
                lat: u.coords.map(|c| c.0),
                lon: u.coords.map(|c| c.1),
            })
            .collect();
        Self { divisions, districts, upazilas }
    }

    /// Load a seed file written by an operator or an export job.
    pub fn from_json_file(path: &Path) -> Result<Self, RegionError> {
        let data = fs::read_to_string(path).map_err(|e| RegionError::Io(e.to_string()))?;
        let seed: SeedFile =
            serde_json::from_str(&data).map_err(|e| RegionError::Parse(e.to_string()))?;
        Self::new(seed.divisions, seed.districts, seed.upazilas)
    }

    /// ~/.rokto/regions.json
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rokto")
            .join("regions.json")
    }

    /// Load the override file if present, otherwise the built-in set.
    /// A broken override is reported and skipped rather than fatal.
    pub fn load_default() -> Self {
        let path = Self::default_path();
        if path.exists() {
            match Self::from_json_file(&path) {
                Ok(store) => return store,
                Err(e) => {
                    eprintln!("Warning: ignoring {}: {}", path.display(), e);
                }
            }
        }
        Self::builtin()
    }

    fn validate(&self) -> Result<(), RegionError> {
        let mut division_ids = HashSet::new();
        for d in &self.divisions {
            if !division_ids.insert(d.id) {
                return Err(RegionError::Inconsistent(format!("duplicate division id {}", d.id)));
            }
        }
        let mut district_ids = HashSet::new();
        for d in &self.districts {
            if !district_ids.insert(d.id) {
                return Err(RegionError::Inconsistent(format!("duplicate district id {}", d.id)));
            }
            if !division_ids.contains(&d.division_id) {
                return Err(RegionError::Inconsistent(format!(
                    "district '{}' references unknown division {}",
                    d.name, d.division_id
                )));
            }
        }
        let mut upazila_ids = HashSet::new();
        for u in &self.upazilas {
            if !upazila_ids.insert(u.id) {
                return Err(RegionError::Inconsistent(format!("duplicate upazila id {}", u.id)));
            }
            if !district_ids.contains(&u.district_id) {
                return Err(RegionError::Inconsistent(format!(
                    "upazila '{}' references unknown district {}",
                    u.name, u.district_id
                )));
            }
            if u.lat.is_some() != u.lon.is_some() {
                return Err(RegionError::Inconsistent(format!(
                    "upazila '{}' has only one coordinate",
                    u.name
                )));
            }
        }
        Ok(())
    }

    // ─── Row access ─────────────────────────────────────────────

    pub fn divisions(&self) -> &[Division] {
        &self.divisions
    }

    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    pub fn upazilas(&self) -> &[Upazila] {
        &self.upazilas
    }

    pub fn division(&self, id: RegionId) -> Option<&Division> {
        self.divisions.iter().find(|d| d.id == id)
    }

    pub fn district(&self, id: RegionId) -> Option<&District> {
        self.districts.iter().find(|d| d.id == id)
    }

    pub fn upazila(&self, id: RegionId) -> Option<&Upazila> {
        self.upazilas.iter().find(|u| u.id == id)
    }

    pub fn districts_of(&self, division_id: RegionId) -> Vec<District> {
        self.districts.iter().filter(|d| d.division_id == division_id).cloned().collect()
    }

    pub fn upazilas_of(&self, district_id: RegionId) -> Vec<Upazila> {
        self.upazilas.iter().filter(|u| u.district_id == district_id).cloned().collect()
    }

    // ─── Name matching ──────────────────────────────────────────
    //
    // All three finders fold the hint, then take the first row (in
    // seed order) whose folded name contains it. An empty hint after
    // folding never matches.

    pub fn find_division(&self, hint: &str) -> Option<&Division> {
        let q = fold_hint(hint);
        if q.is_empty() {
            return None;
        }
        self.divisions.iter().find(|d| fold_name(&d.name).contains(&q))
    }

    pub fn find_district(&self, hint: &str, division: Option<RegionId>) -> Option<&District> {
        let q = fold_hint(hint);
        if q.is_empty() {
            return None;
        }
        self.districts
            .iter()
            .filter(|d| division.map_or(true, |id| d.division_id == id))
            .find(|d| fold_name(&d.name).contains(&q))
    }

    pub fn find_upazila(&self, hint: &str, district: Option<RegionId>) -> Option<&Upazila> {
        let q = fold_hint(hint);
        if q.is_empty() {
            return None;
        }
        self.upazilas
            .iter()
            .filter(|u| district.map_or(true, |id| u.district_id == id))
            .find(|u| fold_name(&u.name).contains(&q))
    }

    // ─── Geometry ───────────────────────────────────────────────

    /// Nearest upazila by squared planar distance in degrees. Rows
    /// without coordinates are skipped; ties keep the earliest row.
    pub fn nearest_upazila(&self, lat: f64, lon: f64) -> Option<&Upazila> {
        let mut best: Option<(&Upazila, f64)> = None;
        for u in &self.upazilas {
            if let Some((ulat, ulon)) = u.coords() {
                let d2 = (ulat - lat).powi(2) + (ulon - lon).powi(2);
                match best {
                    Some((_, best_d2)) if d2 >= best_d2 => {}
                    _ => best = Some((u, d2)),
                }
            }
        }
        best.map(|(u, _)| u)
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            divisions: self.divisions.len(),
            districts: self.districts.len(),
            upazilas: self.upazilas.len(),
            with_coords: self.upazilas.iter().filter(|u| u.coords().is_some()).count(),
        }
    }
}
