//! Built-in sample catalog
//!
//! Substituted when the remote dataset cannot be fetched or parsed, so the
//! rest of the system always has records to work with.

use crate::data::Restaurant;

#[allow(clippy::too_many_arguments)]
fn sample(
    name: &str,
    locality: &str,
    cuisines: &[&str],
    cost_for_two: u32,
    rating: f64,
    votes: u64,
    image_emoji: &str,
    signature_dish: &str,
    open_now: bool,
) -> Restaurant {
    Restaurant {
        name: name.to_string(),
        locality: locality.to_string(),
        cuisines: cuisines.iter().map(|c| c.to_string()).collect(),
        cost_for_two,
        rating,
        votes,
        signature_dish: signature_dish.to_string(),
        address: format!("{}, Bangalore", locality),
        open_now,
        image_emoji: image_emoji.to_string(),
    }
}

/// Curated Bangalore sample (16 restaurants)
pub fn sample_restaurants() -> Vec<Restaurant> {
    vec![
        sample("Jalsa", "Banashankari", &["North Indian", "Mughlai", "Chinese"], 800, 4.1, 775, "🫓", "Dum Biryani", true),
        sample("Onesta", "Banashankari", &["Pizza", "Cafe", "Italian"], 600, 4.6, 2556, "🍕", "Farmhouse Pizza", true),
        sample("Spice Elephant", "Banashankari", &["Chinese", "North Indian", "Thai"], 800, 4.1, 787, "🥢", "Thai Green Curry", false),
        sample("San Churro Cafe", "Banashankari", &["Cafe", "Mexican", "Italian"], 800, 3.8, 918, "☕", "Churros", true),
        sample("Grand Village", "Basavanagudi", &["North Indian", "Rajasthani"], 600, 3.8, 166, "🫙", "Dal Baati", true),
        sample("Timepass Dinner", "Basavanagudi", &["North Indian", "Chinese"], 700, 3.8, 411, "🍛", "Paneer Butter Masala", true),
        sample("The Black Pearl", "Marathahalli", &["North Indian", "European", "Mediterranean"], 1500, 4.8, 7023, "⚓", "Grilled Prawns", true),
        sample("Vidyarthi Bhavan", "Basavanagudi", &["South Indian"], 200, 4.4, 4432, "🥥", "Masala Dosa", true),
        sample("Truffles", "Koramangala", &["Burger", "American", "Italian"], 900, 4.7, 14726, "🍔", "All American Burger", true),
        sample("MTR", "Lalbagh Road", &["South Indian"], 300, 4.5, 3541, "🥥", "Rava Idli", true),
        sample("Glen's Bakehouse", "Indiranagar", &["Bakery", "Desserts", "Cafe"], 600, 4.4, 2541, "🥐", "Red Velvet Cupcake", true),
        sample("Meghana Foods", "Indiranagar", &["Biryani", "Andhra", "North Indian"], 600, 4.4, 6412, "🍗", "Special Chicken Biryani", true),
        sample("Brahmin's Coffee Bar", "Basavanagudi", &["South Indian"], 100, 4.8, 2541, "🥥", "Idli Vada", true),
        sample("Empire Restaurant", "Koramangala", &["North Indian", "Mughlai"], 800, 4.1, 4851, "🍗", "Empire Special Chicken", true),
        sample("Hard Rock Cafe", "MG Road", &["American", "Burger", "Steak"], 2500, 4.4, 1254, "🍔", "Legendary Burger", true),
        sample("Koshy's", "St. Marks Road", &["North Indian", "Chinese", "Continental"], 1000, 4.0, 1241, "🍽️", "Fish and Chips", true),
    ]
}
