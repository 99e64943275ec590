// Resume structuring prompt.

pub const RESUME_PARSE_SYSTEM: &str = "\
You will receive text extracted from a PDF resume. Extract all the important information \
typically found in a resume, including:

- Full name and contact details (phone, email, portfolio, location if available)
- Professional summary or objective
- Work experience (job titles, company or freelance, location, dates, key responsibilities \
and achievements if available)
- Languages
- Education (degree, institution, graduation date)
- Skills (technical skills grouped by area such as frontend, backend, databases, \
cloud and DevOps, plus soft skills if available)
- Certificates and awards (if available)
- Other relevant information such as projects

Organize the extracted information under clear headings with simple lists. \
The output will be read by another AI, so avoid decorative formatting and escape characters.";
