//! Canned replies used by the fallback responder.
//!
//! Every template is already in canonical presentation format: `•`
//! bullets, one blank line after a list-introducing colon, two blank lines
//! between sections, and a closing question on its own line.

pub const PUBLIC_TRANSPORT: &str = "Public transport is definitely a game-changer! 🚌 In Nairobi, matatus and buses can really cut down your carbon emissions compared to driving alone.


Benefits you'll see:

• Lower transportation costs
• Reduced traffic stress
• Meeting new people in your community


Have you tried using public transport more often, or are there barriers that make it challenging for you? (We know matatu music isn't for everyone! 🎵)";

pub const CARBON_FOOTPRINT: &str = "Great question about carbon footprints! 🌱 This is so important in Kenya where climate change affects our daily lives.


Here are the biggest impact areas:

• Energy use - switch to solar or energy-efficient appliances
• Transportation - use matatus, walk, or bike for short trips
• Food choices - eat more local, seasonal produce


Which area feels most doable for you to start with? (No pressure - we're all just trying to save the world one step at a time! 🌍)";

pub const SOLAR_COST: &str = "I understand the cost concern! 💰 Solar has gotten much more affordable in Kenya.


Affordable options:

• Many companies offer payment plans
• Start small with solar chargers or single panels
• Long-term savings on electricity bills (50-70% reduction)


Would a gradual approach work better for your situation? (Rome wasn't built in a day, and neither is the perfect eco-home! 🏠)";

pub const SOLAR: &str = "Solar energy is fantastic in Kenya - we have great sunshine year-round! ☀️ Many homes are seeing huge savings on electricity bills.


Why it's great here:

• Consistent sunshine throughout the year
• Installation has become much easier
• Government incentives available
• 50-70% reduction in electricity costs


Are you thinking about it for your home, or maybe starting with something smaller like solar lighting? (Either way, your electricity meter will thank you! 💡)";

pub const RECYCLING: &str = "Waste management is so important! ♻️ In Kenya, we have growing recycling opportunities.


What you can recycle:

• Plastics - clean containers, bottles, bags
• Glass - bottles and jars
• Paper - newspapers, cardboard, office paper
• Metals - cans and containers


Companies like Petco and local community groups make it easier. But honestly, reducing what we buy first makes the biggest impact.


What kind of waste do you find yourself throwing away most? (Don't worry, we're not judging your take-away containers! 📦)";

pub const WATER: &str = "Water conservation is crucial in Kenya! 💧 Every drop counts, especially during dry seasons.


Simple conservation tips:

• Fix leaky taps and pipes immediately
• Take shorter showers (aim for 5 minutes)
• Collect rainwater for gardens
• Install water-efficient fixtures


Many people are also using greywater systems for their gardens.


Have you noticed any water waste around your home that might be easy to fix? (Spoiler alert: that dripping tap is definitely plotting against your water bill! 💧)";

pub const FOOD: &str = "Local, sustainable food makes such a difference! 🥬 Kenya has amazing agricultural diversity.


Benefits of buying local:

• Supports Kenyan farmers directly
• Reduces transport emissions
• Fresher, more nutritious food
• Often more affordable than imported options


Great places to find local produce:

• Farmers markets in your area
• Community-supported agriculture (CSA) programs
• Local organic farms


Do you have a favorite market, or are you interested in maybe growing some of your own herbs? (Warning: homegrown tomatoes may ruin store-bought ones forever! 🍅)";

pub const TREES: &str = "Trees are amazing for fighting climate change! 🌳 Kenya's doing great work with reforestation initiatives.


Environmental benefits:

• Clean the air and produce oxygen
• Prevent soil erosion
• Provide habitat for wildlife
• Cool down temperatures naturally


Even in small spaces you can make a difference:

• Plant herbs on windowsills
• Grow small trees in containers
• Join community tree-planting events


Do you have space for any plants where you live? (Even a windowsill herb garden counts as joining the green revolution! 🌿)";

pub const TRANSPORT: &str = "Transportation is a big part of our carbon footprint! 🚌 In Kenya, we have many eco-friendly options.


Sustainable transport options:

• Matatus - shared rides reduce individual emissions
• Boda bodas - efficient for short distances
• Walking - free and healthy!
• Cycling - growing bike culture in cities
• Electric vehicles - becoming more available


Each option has different benefits for cost, convenience, and environmental impact.


How do you usually get around, and would other options work for your routine? (We promise walking to work won't turn you into a fitness influencer... or will it? 🚶‍♀️)";

/// Replies for messages that match no topic; one is picked at random.
pub const GENERIC: [&str; 2] = [
    "That's a great question about sustainability! 🌱 Kenya is facing real climate challenges, but there's so much we can do.


Quick wins to get started:

• Use energy-efficient light bulbs
• Turn off electronics when not in use
• Choose public transport for longer trips
• Buy local products when possible


What aspect of sustainable living interests you most - energy, transportation, or maybe waste reduction? (Plot twist: they all save you money too! 💰)",
    "Climate action is so important right now! 🌍 The good news is that sustainable choices often save money too.


Areas where you can make an impact:

• Renewable energy - especially solar in Kenya
• Water conservation - crucial during dry seasons
• Sustainable transportation options
• Supporting local, eco-friendly businesses


Which of these sounds most exciting to you - or are you the type who wants to tackle them all at once? (We admire the ambition! 🚀)",
];

/// Every template, for checks that apply to all of them.
pub const ALL: [&str; 11] = [
    PUBLIC_TRANSPORT,
    CARBON_FOOTPRINT,
    SOLAR_COST,
    SOLAR,
    RECYCLING,
    WATER,
    FOOD,
    TREES,
    TRANSPORT,
    GENERIC[0],
    GENERIC[1],
];
